use fitness_dashboard::{load_prefs, resolve_prefs_path, router, AppState};
use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let api_base = env::var("API_BASE_URL")
        .map_err(|_| "API_BASE_URL must point at the fitness API")?;

    let prefs_path = resolve_prefs_path();
    if let Some(parent) = prefs_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let prefs = load_prefs(&prefs_path).await;

    let state = AppState::new(reqwest::Client::new(), api_base, prefs_path, prefs);
    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
