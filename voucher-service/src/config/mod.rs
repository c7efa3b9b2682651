use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub depa: DepaConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub db_name: String,
}

/// Connection settings for the DEPA partner API.
#[derive(Deserialize, Clone, Debug)]
pub struct DepaConfig {
    pub base_url: String,
    pub api_key: Secret<String>,
    /// Per-call timeout applied to the upstream HTTP client.
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("VOUCHER_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("VOUCHER_SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let db_url = env::var("VOUCHER_DATABASE_URL")
            .map_err(|_| anyhow!("VOUCHER_DATABASE_URL must be set"))?;
        let db_name =
            env::var("VOUCHER_DATABASE_NAME").unwrap_or_else(|_| "voucher_db".to_string());

        let depa_base_url = env::var("DEPA_API_BASE_URL")
            .unwrap_or_else(|_| "https://aitransformapi.depa.or.th".to_string());
        let depa_api_key = env::var("DEPA_API_KEY").unwrap_or_default();
        let depa_timeout_secs = env::var("DEPA_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?;

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                db_name,
            },
            depa: DepaConfig {
                base_url: depa_base_url,
                api_key: Secret::new(depa_api_key),
                timeout_secs: depa_timeout_secs,
            },
            service_name: "voucher-service".to_string(),
        })
    }
}
