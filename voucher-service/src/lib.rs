pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use config::Config;
use error::AppError;
use mongodb::{options::ClientOptions, Client};
use secrecy::ExposeSecret;
use services::{DepaClient, MappingStore, MongoMappingStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state. Collaborators are constructed once in
/// [`Application::build`] and injected here; the mapping store sits behind a
/// trait object so tests can substitute a double.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub depa: DepaClient,
    pub mappings: Arc<dyn MappingStore>,
}

/// Build the HTTP router over the given state.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/submit-usage", post(handlers::submit_usage))
        .route("/get-vouchers", post(handlers::get_vouchers))
        .route("/get-usage", post(handlers::get_usage))
        .route("/save-voucher-mapping", post(handlers::save_mapping))
        .route("/get-voucher-mapping/:voucher_code", get(handlers::get_mapping))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect collaborators and bind the listener. Binding happens here so
    /// port 0 resolves to a real port before serving.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(config.database.url.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse MongoDB connection string: {}", e);
                AppError::StoreError(e.into())
            })?;
        client_options.app_name = Some(config.service_name.clone());

        let client = Client::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::StoreError(e.into())
        })?;
        let db = client.database(&config.database.db_name);

        let store = MongoMappingStore::new(&db);
        store.init_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let depa = DepaClient::new(config.depa.clone())?;
        if depa.is_configured() {
            tracing::info!("DEPA client initialized");
        } else {
            tracing::warn!("DEPA_API_KEY not configured - upstream calls will be rejected");
        }

        let state = AppState {
            config: config.clone(),
            depa,
            mappings: Arc::new(store),
        };
        let router = app_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("Listening on port {}", self.port);
        axum::serve(self.listener, self.router).await
    }
}
