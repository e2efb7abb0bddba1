use crate::models::{product::ID_FIELD, Product, ProductFields};
use crate::services::store::{ProductStore, StoreError, StoreOutcome};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Client as MongoClient, Collection, Database,
};
use serde_json::Value;
use service_core::error::AppError;

/// Product store backed by a MongoDB collection of untyped documents.
#[derive(Clone)]
pub struct MongoProductStore {
    db: Database,
    products: Collection<Document>,
}

impl MongoProductStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, collection = %collection, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        let products = db.collection::<Document>(collection);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { db, products })
    }

    async fn find(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let found = self.products.find_one(id_filter(id)?, None).await?;
        found.map(document_to_product).transpose()
    }

    async fn update(&self, id: &str, fields: ProductFields) -> Result<Option<Product>, StoreError> {
        let filter = id_filter(id)?;
        let changes = fields_to_document(fields)?;

        // `$set` with an empty document is rejected by the server.
        if changes.is_empty() {
            return self.find(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .products
            .find_one_and_update(filter, doc! { "$set": changes }, options)
            .await?;
        updated.map(document_to_product).transpose()
    }

    async fn delete(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let deleted = self
            .products
            .find_one_and_delete(id_filter(id)?, None)
            .await?;
        deleted.map(document_to_product).transpose()
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let cursor = self.products.find(None, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents.into_iter().map(document_to_product).collect()
    }

    async fn get_by_id(&self, id: &str) -> StoreOutcome<Product> {
        self.find(id).await.into()
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let mut document = fields_to_document(fields)?;
        let result = self.products.insert_one(&document, None).await?;
        document.insert(ID_FIELD, result.inserted_id);
        document_to_product(document)
    }

    async fn update_by_id(&self, id: &str, fields: ProductFields) -> StoreOutcome<Product> {
        self.update(id, fields).await.into()
    }

    async fn delete_by_id(&self, id: &str) -> StoreOutcome<Product> {
        self.delete(id).await.into()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

fn id_filter(id: &str) -> Result<Document, StoreError> {
    let oid = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;
    Ok(doc! { "_id": oid })
}

/// Caller fields as a BSON document, without any `_id` the caller sent.
fn fields_to_document(mut fields: ProductFields) -> Result<Document, StoreError> {
    fields.remove(ID_FIELD);
    Ok(mongodb::bson::to_document(&fields)?)
}

fn document_to_product(mut document: Document) -> Result<Product, StoreError> {
    let id = match document.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(id)) => id,
        Some(other) => other.to_string(),
        None => {
            return Err(StoreError::Conversion(
                "document has no _id field".to_string(),
            ))
        }
    };

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(fields) => Ok(Product::new(id, fields)),
        other => Err(StoreError::Conversion(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}
