use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ProductConfig {
    pub common: core_config::Config,
    pub store: StoreBackend,
    pub mongodb: MongoConfig,
    /// Mount point of the product routes, e.g. `/api/products`.
    pub base_path: String,
    /// When set, spans are exported to this OTLP collector.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown PRODUCT_STORE '{}'. Must be one of: mongodb, memory",
                other
            ))),
        }
    }
}

impl ProductConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let store: StoreBackend = get_env("PRODUCT_STORE", Some("mongodb"), false)?.parse()?;
        // MongoDB settings only matter when MongoDB is the selected backend.
        let mongo_required = is_prod && store == StoreBackend::MongoDb;
        let uri_default = match store {
            StoreBackend::MongoDb => None,
            StoreBackend::Memory => Some(""),
        };

        Ok(ProductConfig {
            common: common_config,
            store,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", uri_default, mongo_required)?,
                database: get_env("MONGODB_DATABASE", Some("product_db"), mongo_required)?,
                collection: get_env("MONGODB_COLLECTION", Some("products"), mongo_required)?,
            },
            base_path: normalize_base_path(&get_env(
                "PRODUCTS_BASE_PATH",
                Some("/api/products"),
                false,
            )?),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
        })
    }
}

/// Leading slash, no trailing slash; the root collapses to `/`.
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{}", trimmed)
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
