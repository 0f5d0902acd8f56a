mod handlers;
mod route;

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Socket address to listen on
    #[clap(short, long, default_value = "0.0.0.0:3000")]
    addr: SocketAddr,
    /// Directory holding the built pwa (index.html, client wasm, sw.js)
    #[clap(short, long, default_value = "pwa")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let app = route::router(&args.static_dir);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    tracing::info!("listening on http://{}", args.addr);

    axum::serve(listener, app).await?;

    Ok(())
}
