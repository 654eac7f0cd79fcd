//! JSON API for document analysis.
//!
//! Exposes the recent-documents store and every analysis operation. Failed
//! analyses answer 502 with the operation's fixed message; the cause is
//! only logged.

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::actions::Actions;
use crate::analysis::Analyzer;
use crate::config::{Config, Settings};
use crate::llm::LlmClient;
use crate::store::RecentDocuments;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub actions: Actions,
    pub documents: Arc<RecentDocuments>,
}

impl AppState {
    pub fn new(settings: &Settings, config: &Config) -> anyhow::Result<Self> {
        let client = LlmClient::new(config.llm.clone())?;
        let analyzer = Analyzer::new(Arc::new(client), config.analyzer_settings());

        Ok(Self {
            actions: Actions::new(analyzer),
            documents: Arc::new(settings.open_documents()?),
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings, config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
