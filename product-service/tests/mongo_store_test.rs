//! End-to-end tests against a live MongoDB.
//!
//! Run with `MONGODB_URI` pointing at a disposable instance and
//! `cargo test -- --ignored`.

use mongodb::bson::oid::ObjectId;
use product_service::config::{MongoConfig, ProductConfig, StoreBackend};
use product_service::startup::Application;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use uuid::Uuid;

struct TestApp {
    address: String,
}

impl TestApp {
    async fn spawn() -> Self {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let config = ProductConfig {
            common: CoreConfig {
                port: 0,
                ..CoreConfig::default()
            },
            store: StoreBackend::MongoDb,
            mongodb: MongoConfig {
                uri,
                database: format!("product_test_{}", Uuid::new_v4().simple()),
                collection: "products".to_string(),
            },
            base_path: "/api/products".to_string(),
            otlp_endpoint: None,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp { address }
    }

    fn products_url(&self) -> String {
        format!("{}/api/products", self.address)
    }

    fn product_url(&self, id: &str) -> String {
        format!("{}/api/products/{}", self.address, id)
    }
}

#[tokio::test]
#[ignore = "Requires a running MongoDB instance"]
async fn crud_round_trip_against_mongodb() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(app.products_url())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!([]));

    let created: Value = client
        .post(app.products_url())
        .json(&json!({ "name": "Product 1", "quantity": 3 }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    let id = created["_id"].as_str().expect("created product has an id").to_string();
    assert_eq!(created["name"], "Product 1");

    let response = client
        .put(app.product_url(&id))
        .json(&json!({ "quantity": 7 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated, json!({ "_id": id, "name": "Product 1", "quantity": 7 }));

    let response = client
        .put(app.product_url(&id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), updated);

    let missing_id = ObjectId::new().to_hex();
    let response = client
        .put(app.product_url(&missing_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(app.product_url(&id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(app.product_url(&id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running MongoDB instance"]
async fn malformed_object_id_is_a_store_error() {
    let app = TestApp::spawn().await;

    let response = Client::new()
        .get(app.product_url("not-an-object-id"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Invalid product id: not-an-object-id" }));
}
