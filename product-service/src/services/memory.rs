use crate::models::{Product, ProductFields};
use crate::services::store::{ProductStore, StoreError, StoreOutcome};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process product store. Records are kept in insertion order.
#[derive(Default)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> StoreOutcome<Product> {
        let products = self.products.read().await;
        match products.iter().find(|p| p.id == id) {
            Some(product) => StoreOutcome::Found(product.clone()),
            None => StoreOutcome::NotFound,
        }
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let product = Product::new(Uuid::new_v4().simple().to_string(), fields);
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn update_by_id(&self, id: &str, fields: ProductFields) -> StoreOutcome<Product> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.apply(fields);
                StoreOutcome::Found(product.clone())
            }
            None => StoreOutcome::NotFound,
        }
    }

    async fn delete_by_id(&self, id: &str) -> StoreOutcome<Product> {
        let mut products = self.products.write().await;
        match products.iter().position(|p| p.id == id) {
            Some(index) => StoreOutcome::Found(products.remove(index)),
            None => StoreOutcome::NotFound,
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
