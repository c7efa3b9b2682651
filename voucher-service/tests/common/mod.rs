use async_trait::async_trait;
use mongodb::bson::DateTime;
use secrecy::Secret;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use voucher_service::config::{Config, DatabaseConfig, DepaConfig, ServerConfig};
use voucher_service::error::AppError;
use voucher_service::models::{MappingWrite, VoucherMapping};
use voucher_service::services::{DepaClient, MappingStore};
use voucher_service::{app_router, AppState};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";

/// In-memory mapping store double with the same upsert-merge semantics as
/// the Mongo implementation, plus call counters and injectable lookup
/// failures for fault-tolerance tests.
#[derive(Default)]
pub struct InMemoryMappingStore {
    documents: Mutex<HashMap<String, VoucherMapping>>,
    failing_codes: Mutex<HashSet<String>>,
    pub get_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
}

impl InMemoryMappingStore {
    /// Make lookups for the given voucher code fail.
    pub fn fail_lookups_for(&self, voucher_code: &str) {
        self.failing_codes
            .lock()
            .unwrap()
            .insert(voucher_code.to_string());
    }

    pub fn get_call_count(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn write_call_count(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn get(&self, voucher_code: &str) -> Result<Option<VoucherMapping>, AppError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_codes.lock().unwrap().contains(voucher_code) {
            return Err(AppError::StoreError(anyhow::anyhow!("store unavailable")));
        }
        Ok(self.documents.lock().unwrap().get(voucher_code).cloned())
    }

    async fn upsert_merge(&self, write: MappingWrite) -> Result<VoucherMapping, AppError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut documents = self.documents.lock().unwrap();

        let merged = match documents.get(&write.voucher_code) {
            Some(existing) => VoucherMapping {
                voucher_code: write.voucher_code.clone(),
                app_user_id: write.app_user_id,
                first_name: write.first_name.unwrap_or_else(|| existing.first_name.clone()),
                last_name: write.last_name.unwrap_or_else(|| existing.last_name.clone()),
                product_name: write
                    .product_name
                    .unwrap_or_else(|| existing.product_name.clone()),
                updated_at: DateTime::now(),
            },
            None => VoucherMapping {
                voucher_code: write.voucher_code.clone(),
                app_user_id: write.app_user_id,
                first_name: write.first_name.unwrap_or_default(),
                last_name: write.last_name.unwrap_or_default(),
                product_name: write.product_name.unwrap_or_default(),
                updated_at: DateTime::now(),
            },
        };

        documents.insert(write.voucher_code, merged.clone());
        Ok(merged)
    }
}

pub struct TestApp {
    pub address: String,
    pub depa_server: MockServer,
    pub mappings: Arc<InMemoryMappingStore>,
}

impl TestApp {
    /// Spawn the service on a random port with a wiremock DEPA upstream and
    /// an in-memory mapping store.
    pub async fn spawn() -> Self {
        let depa_server = MockServer::start().await;
        let upstream_url = depa_server.uri();
        Self::spawn_with_upstream(depa_server, upstream_url).await
    }

    /// Spawn with an unreachable upstream to exercise network-failure paths.
    pub async fn spawn_with_dead_upstream() -> Self {
        let depa_server = MockServer::start().await;
        // Nothing listens on port 1; connections are refused immediately.
        Self::spawn_with_upstream(depa_server, "http://127.0.0.1:1".to_string()).await
    }

    async fn spawn_with_upstream(depa_server: MockServer, upstream_url: String) -> Self {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: Secret::new("mongodb://localhost:27017".to_string()),
                db_name: "voucher_test".to_string(),
            },
            depa: DepaConfig {
                base_url: upstream_url,
                api_key: Secret::new(TEST_API_KEY.to_string()),
                timeout_secs: 5,
            },
            service_name: "voucher-service-test".to_string(),
        };

        let depa = DepaClient::new(config.depa.clone()).expect("Failed to build DEPA client");
        let mappings = Arc::new(InMemoryMappingStore::default());
        let store: Arc<dyn MappingStore> = mappings.clone();

        let state = AppState {
            config,
            depa,
            mappings: store,
        };
        let router = app_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server crashed");
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            depa_server,
            mappings,
        }
    }
}
