use assessment_backend::{config::Config, router, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads `.env` first so RUST_LOG and LOG_FORMAT from it reach the subscriber.
    let config = Config::from_env()?;
    init_tracing();

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; question generation requests will fail");
    }
    info!(model = %config.gemini_model, "Using generation model");

    let addr: SocketAddr = config.server_address.parse()?;
    let app = router(AppState::new(config)?);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
