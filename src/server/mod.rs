//! HTTP transport around the resolution chain

pub mod error;
pub mod handlers;

use crate::resolver::ResolutionChain;
use crate::server::error::ApiError;
use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<ResolutionChain>,
}

impl AppState {
    pub fn new(chain: ResolutionChain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::OPTIONS, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        // OPTIONS never reaches the handlers: the CORS layer answers it
        .route(
            "/api/download",
            get(handlers::download).fallback(handlers::method_not_allowed),
        )
        .route("/api/health", get(handlers::health))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn serve(listen_addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    info!("Listening on {}", listen_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Request handler panicked: {}", message);
    ApiError::Internal(message).into_response()
}
