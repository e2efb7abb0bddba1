use crate::config::{ProductConfig, StoreBackend};
use crate::handlers;
use crate::services::{MemoryProductStore, MongoProductStore, ProductStore};
use axum::extract::Request;
use axum::middleware::from_fn;
use axum::{routing::get, Router, ServiceExt};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// The served application: the router behind trailing-slash normalisation,
/// so `/api/products/` and `/api/products` reach the same handler.
pub type ProductApp = NormalizePath<Router>;

/// Shared handler state. The store is injected here rather than reached
/// through a global connection.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }
}

/// Product CRUD routes, relative to the base path.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

pub fn build_router(state: AppState, base_path: &str) -> Router {
    let service_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics));

    // axum refuses to nest at the root, so a `/` base path is merged instead.
    let router = if base_path == "/" {
        service_routes.merge(product_routes())
    } else {
        service_routes
            .route("/", get(handlers::greeting))
            .nest(base_path, product_routes())
    };

    router
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Wraps the router so trailing slashes are trimmed before routing happens.
pub fn build_app(state: AppState, base_path: &str) -> ProductApp {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, base_path))
}

async fn connect_store(config: &ProductConfig) -> Result<Arc<dyn ProductStore>, AppError> {
    match config.store {
        StoreBackend::MongoDb => {
            let store = MongoProductStore::connect(
                &config.mongodb.uri,
                &config.mongodb.database,
                &config.mongodb.collection,
            )
            .await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory product store; data is lost on restart");
            Ok(Arc::new(MemoryProductStore::new()))
        }
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    app: ProductApp,
}

impl Application {
    /// Connects the configured store and binds the listener. Port `0` picks a free port.
    pub async fn build(config: ProductConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        Self::with_store(config, store).await
    }

    pub async fn with_store(
        config: ProductConfig,
        store: Arc<dyn ProductStore>,
    ) -> Result<Self, AppError> {
        let app = build_app(AppState::new(store), &config.base_path);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port = port,
            base_path = %config.base_path,
            "product-service listening"
        );

        Ok(Self {
            port,
            listener,
            app,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(
            self.listener,
            ServiceExt::<Request>::into_make_service(self.app),
        )
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
