use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use price_scraper::config::Environment;
use price_scraper::{api, build_http_client, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let default_level = Environment::from_env().default_log_level();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = Config::from_env()?;

    info!("Starting Price Scraper ({:?})", config.environment);
    info!("Fetch timeout: {}s", config.fetch_timeout.as_secs());
    if config.is_development() {
        info!("Allowed CORS origins: {:?}", config.allowed_origins);
    }

    let http_client = build_http_client(&config)?;
    let state = Arc::new(AppState::new(http_client));
    let app = api::router(state, api::cors_layer(&config));

    let addr = config.bind_addr();
    match &config.tls {
        Some((cert_path, key_path)) => {
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path).await?;
            info!("Price Scraper listening on https://{}", addr);
            axum_server::bind_rustls(addr.parse()?, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Price Scraper listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
