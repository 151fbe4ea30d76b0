use anyhow::Result;
use axum::Router;
use clap::Parser;
use scoop_core::Engine;
use scoop_server::{build_app, load_config, load_corpus};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Flavor corpus JSON file ({"flavors": [...]})
    #[arg(long, default_value = "./init.json")]
    data: PathBuf,
    /// Optional engine config JSON (field weights, latent rank, df bounds)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let records = load_corpus(&args.data)?;
    let config = load_config(args.config.as_deref())?;
    let engine = Engine::build(records, &config)?;
    let app: Router = build_app(Arc::new(engine));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
