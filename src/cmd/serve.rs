//! Serve-docs command CLI handler.

use crate::serve::{self, ServeConfig};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn run(dir: PathBuf, host: IpAddr, port: u16) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("unable to init tracing_subscriber: {e}"))?;

    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    println!();
    println!("Endpoint at:");
    println!("{}", serve::endpoint_url(port));
    println!();

    let config = ServeConfig { dir, host, port };
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve::run(config))
}
