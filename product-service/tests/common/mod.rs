#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use product_service::models::{Product, ProductFields};
use product_service::services::{ProductStore, StoreError, StoreOutcome};
use product_service::startup::{build_app, AppState, ProductApp};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const BASE_PATH: &str = "/api/products";
pub const EXISTING_ID: &str = "12345";
pub const MISSING_ID: &str = "67890";

pub fn fields(value: Value) -> ProductFields {
    value
        .as_object()
        .cloned()
        .expect("test fields must be a JSON object")
}

/// Knows exactly one product, `12345`; every other id is missing.
pub struct StubProductStore;

#[async_trait]
impl ProductStore for StubProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(vec![
            Product::new("1", fields(serde_json::json!({ "name": "Product 1" }))),
            Product::new("2", fields(serde_json::json!({ "name": "Product 2" }))),
        ])
    }

    async fn get_by_id(&self, id: &str) -> StoreOutcome<Product> {
        if id == EXISTING_ID {
            StoreOutcome::Found(Product::new(
                id,
                fields(serde_json::json!({ "name": "Product 1" })),
            ))
        } else {
            StoreOutcome::NotFound
        }
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        Ok(Product::new("new-id", fields))
    }

    async fn update_by_id(&self, id: &str, fields: ProductFields) -> StoreOutcome<Product> {
        if id == EXISTING_ID {
            StoreOutcome::Found(Product::new(id, fields))
        } else {
            StoreOutcome::NotFound
        }
    }

    async fn delete_by_id(&self, id: &str) -> StoreOutcome<Product> {
        if id == EXISTING_ID {
            StoreOutcome::Found(Product::new(
                id,
                fields(serde_json::json!({ "name": "Product to delete" })),
            ))
        } else {
            StoreOutcome::NotFound
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Every call fails as if the database connection had dropped.
pub struct FailingProductStore;

fn database_error() -> StoreError {
    StoreError::Database("Database error".to_string())
}

#[async_trait]
impl ProductStore for FailingProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        Err(database_error())
    }

    async fn get_by_id(&self, _id: &str) -> StoreOutcome<Product> {
        StoreOutcome::Failed(database_error())
    }

    async fn create(&self, _fields: ProductFields) -> Result<Product, StoreError> {
        Err(database_error())
    }

    async fn update_by_id(&self, _id: &str, _fields: ProductFields) -> StoreOutcome<Product> {
        StoreOutcome::Failed(database_error())
    }

    async fn delete_by_id(&self, _id: &str) -> StoreOutcome<Product> {
        StoreOutcome::Failed(database_error())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(database_error())
    }
}

pub fn router_with(store: impl ProductStore + 'static) -> ProductApp {
    build_app(AppState::new(Arc::new(store)), BASE_PATH)
}

pub fn product_uri(id: &str) -> String {
    format!("{}/{}", BASE_PATH, id)
}

/// Sends one request through the router and returns status plus JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: ProductApp,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    send_request(app, request).await
}

pub async fn send_request(app: ProductApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}
