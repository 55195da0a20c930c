//! Server implementation
//!
//! Wires the store, router and listener together.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{ChatConfig, ChatConfigBuilder};
use crate::engine::Store;
use crate::error::ChatError;
use crate::handler::{chat, health_check, index};
use crate::seed;

/// Shared state for request handlers
pub struct AppState {
    pub store: Store,
    pub config: ChatConfig,
}

impl AppState {
    pub fn new(store: Store, config: ChatConfig) -> Self {
        Self { store, config }
    }
}

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Tracing layer for request logging
    let trace = TraceLayer::new_for_http();
    let cors_enabled = state.config.server.cors;

    let router = Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .route("/health", get(health_check))
        .layer(trace);

    let router = if cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

/// The chat server
pub struct ChatServer {
    config: ChatConfig,
    state: Option<Arc<AppState>>,
}

impl ChatServer {
    /// Create a new server with the given configuration
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a server builder
    pub fn builder() -> ChatServerBuilder {
        ChatServerBuilder::default()
    }

    /// Connect to the store, create the schema and seed it if configured
    pub async fn init(&mut self) -> Result<(), ChatError> {
        tracing::info!("Initializing hrchat...");

        tracing::info!("Opening database: {}", self.config.database.url);
        let store = Store::connect(&self.config.database.url).await?;

        seed::create_schema(&store).await?;
        if self.config.database.seed {
            seed::seed_sample_data(&store).await?;
        }

        self.state = Some(Arc::new(AppState::new(store, self.config.clone())));

        tracing::info!("Server initialized");
        Ok(())
    }

    /// Start serving requests until Ctrl-C
    ///
    /// # Errors
    /// Returns error if the server was not initialized or fails to bind
    pub async fn serve(&self) -> Result<(), ChatError> {
        let state = self.state.as_ref().ok_or_else(|| {
            ChatError::Config("Server not initialized. Call init() first.".to_string())
        })?;

        let router = create_router(Arc::clone(state));

        let addr = &self.config.server.bind;
        tracing::info!("hrchat listening on http://{}", addr);
        tracing::info!("   GET  /        - Chat page");
        tracing::info!("   POST /chat    - Ask a question");
        tracing::info!("   GET  /health  - Health check");

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ChatError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        state.store.close().await;
        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
    }
}

/// Builder for the ChatServer
#[derive(Debug, Default)]
pub struct ChatServerBuilder {
    config: ChatConfigBuilder,
}

impl ChatServerBuilder {
    /// Use a loaded configuration as the starting point
    pub fn config(mut self, config: ChatConfig) -> Self {
        self.config = ChatConfigBuilder::from_config(config);
        self
    }

    /// Set the database URL
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.database(url);
        self
    }

    /// Set the bind address
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.config = self.config.bind(addr);
        self
    }

    /// Enable or disable sample-data seeding
    pub fn seed(mut self, seed: bool) -> Self {
        self.config = self.config.seed(seed);
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enabled: bool) -> Self {
        self.config = self.config.cors(enabled);
        self
    }

    /// Build the server
    pub fn build(self) -> ChatServer {
        ChatServer::new(self.config.build())
    }

    /// Build and initialize the server
    ///
    /// # Errors
    /// Returns error if initialization fails
    pub async fn build_and_init(self) -> Result<ChatServer, ChatError> {
        let mut server = self.build();
        server.init().await?;
        Ok(server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_requires_init() {
        let server = ChatServer::builder().database("sqlite::memory:").build();
        let err = server.serve().await.unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[tokio::test]
    async fn test_init_seeds_store() {
        let server = ChatServer::builder()
            .database("sqlite::memory:")
            .build_and_init()
            .await
            .unwrap();
        let state = server.state.as_ref().unwrap();
        assert_eq!(state.store.employees().await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_init_without_seed_leaves_tables_empty() {
        let server = ChatServer::builder()
            .database("sqlite::memory:")
            .seed(false)
            .build_and_init()
            .await
            .unwrap();
        let state = server.state.as_ref().unwrap();
        assert!(state.store.employees().await.unwrap().is_empty());
    }

    #[test]
    fn test_loaded_config_keeps_values_not_overridden() {
        let loaded = ChatConfig::from_toml_str(
            r#"
            [database]
            url = "sqlite::memory:"
            seed = false

            [server]
            cors = true
            "#,
        )
        .unwrap();
        let server = ChatServer::builder().config(loaded).bind("0.0.0.0:8000").build();

        assert_eq!(server.config.database.url, "sqlite::memory:");
        assert!(!server.config.database.seed);
        assert!(server.config.server.cors);
        assert_eq!(server.config.server.bind, "0.0.0.0:8000");
    }
}
