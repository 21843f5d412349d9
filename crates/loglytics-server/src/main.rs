use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use loglytics_search::{HttpSearchClient, OpenSearchBackend};
use loglytics_server::state::{AppState, InMemorySegmentStore};

/// `loglytics health` — liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$LOGLYTICS_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("LOGLYTICS_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Health-check subcommand — handled before anything else so the binary
    // stays cheap as a Docker HEALTHCHECK probe.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }

    // Structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("loglytics=info".parse()?),
        )
        .json()
        .init();

    let cfg = loglytics_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let search = HttpSearchClient::from_config(&cfg)?;
    let analytics = Arc::new(OpenSearchBackend::new(search));

    // Segment persistence is owned by the surrounding platform; the in-memory
    // store serves standalone and development runs.
    let segments = Arc::new(InMemorySegmentStore::default());

    let state = Arc::new(AppState::new(analytics, segments, cfg.clone()));

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = loglytics_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, search_url = %cfg.search_url, "Loglytics listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
