//! # HOLONET API Server
//!
//! REST API over the Star Wars API, consumed by the catalog frontend.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness and cache statistics
//! - `GET /api/characters` - Paginated character list, optionally filtered by `query`
//! - `GET /api/characters/search` - Name search (requires `query`)
//! - `GET /api/characters/:id` - Character with homeworld, films, species, vehicles and starships resolved
//! - `POST /api/characters/cache/clear` - Drop the cached character listing
//!
//! Every response uses the `{ success, data | error, timestamp }` envelope.
//!
//! ## Example
//!
//! ```rust,ignore
//! use holonet_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::new(ApiConfig::from_env())?;
//! server.run(([0, 0, 0, 0], 3001)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod routes;
mod handlers;
mod state;
mod dto;
mod error;
mod search;

pub use routes::create_router;
pub use state::{AppState, ApiConfig};
pub use error::ApiError;
pub use search::{filter_by_name, matches_name, paginate, ListParams};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for HOLONET.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> holonet_core::Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address until Ctrl-C.
    ///
    /// Cache sweepers start with the server and are stopped on shutdown.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        self.state.start_background_tasks();
        info!("HOLONET API server listening on {}", addr);

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;

        self.state.shutdown();
        info!("HOLONET API server stopped");
        result
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
