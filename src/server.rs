use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::{api, config::Config, error::Result, types::PkceToken};

/// State shared between the login flow and the callback handler.
#[derive(Clone)]
pub struct CallbackState {
    pub pkce: Arc<Mutex<Option<PkceToken>>>,
    pub config: Arc<Config>,
}

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the login callback until the task is aborted.
pub async fn start_api_server(state: CallbackState) -> Result<()> {
    let addr = state.config.server_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| error!(%addr, error = %e, "failed to bind callback server"))?;

    info!(%addr, "callback server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
