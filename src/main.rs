//! Demo server for the prettify middleware.
//!
//! Serves a sample JSON document on `/`; request it with `?pretty=true` to
//! see the formatted variant.

use std::path::PathBuf;

use axum::{routing::get, Json, Router};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use axum_prettify::{config, PrettifyConfig, PrettifyLayer};

#[derive(Parser)]
#[command(about = "Demo server for axum-prettify")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: String,

    /// Optional TOML config file for the middleware.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "axum_prettify=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let prettify_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => PrettifyConfig::default(),
    };

    tracing::info!(
        query = %prettify_config.query.name,
        always_on = prettify_config.always_on,
        indent_width = prettify_config.format.indent_width,
        "Configuration loaded"
    );

    let app = Router::new()
        .route("/", get(overview))
        .layer(PrettifyLayer::new(prettify_config))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&args.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn overview() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "axum-prettify-demo",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/", "/?pretty=true"],
        "limits": {
            "max_buffer_size": 2 * 1024 * 1024,
            "timeout_secs": 30
        }
    }))
}
