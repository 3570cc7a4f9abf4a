//! Static file server for the generated API documentation.
//!
//! Every response, including errors, carries
//! `Access-Control-Allow-Origin: *` so the Swagger UI can be opened from
//! another origin than the API it documents.

use anyhow::Context;
use axum::http::{header, HeaderValue};
use axum::Router;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const DEFAULT_PORT: u16 = 8000;

/// Entry page of the Swagger UI inside the served directory
pub const SWAGGER_PATH: &str = "/swagger/index.html";

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub dir: PathBuf,
    pub host: IpAddr,
    pub port: u16,
}

pub fn endpoint_url(port: u16) -> String {
    format!("http://localhost:{}{}", port, SWAGGER_PATH)
}

pub fn router(dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Serve `dir` on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, dir: PathBuf, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(&dir))
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn run(config: ServeConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        "Serving {} at http://{}",
        config.dir.display(),
        listener.local_addr()?
    );

    serve(listener, config.dir, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
