//! Store gateway: the boundary between the HTTP handlers and the document
//! database.
//!
//! Lookups by identifier return a [`StoreOutcome`] so that "no such record"
//! and "the store failed" are separate variants rather than `null` versus a
//! thrown error.

use crate::models::{Product, ProductFields};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Failure reported by the database driver. The message is the driver's own.
    #[error("{0}")]
    Database(String),

    #[error("Invalid product id: {0}")]
    InvalidId(String),

    #[error("Failed to convert product document: {0}")]
    Conversion(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Conversion(err.to_string())
    }
}

/// Result of an operation addressed to a single product.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOutcome<T> {
    Found(T),
    NotFound,
    Failed(StoreError),
}

impl<T> From<Result<Option<T>, StoreError>> for StoreOutcome<T> {
    fn from(result: Result<Option<T>, StoreError>) -> Self {
        match result {
            Ok(Some(value)) => StoreOutcome::Found(value),
            Ok(None) => StoreOutcome::NotFound,
            Err(err) => StoreOutcome::Failed(err),
        }
    }
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every stored product, in store-defined order.
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_by_id(&self, id: &str) -> StoreOutcome<Product>;

    /// Persists `fields` under a freshly assigned identifier.
    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError>;

    /// Applies `fields` on top of the stored record and returns the result.
    async fn update_by_id(&self, id: &str, fields: ProductFields) -> StoreOutcome<Product>;

    /// Removes the record and returns it as it was before deletion.
    async fn delete_by_id(&self, id: &str) -> StoreOutcome<Product>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}
