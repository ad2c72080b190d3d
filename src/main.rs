use augur::config::Config;
use augur::sources::{MarketDataSource, YahooFinanceClient};
use augur::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting Augur server on {}", config.bind_addr());

    let yahoo = YahooFinanceClient::from_config(&config)?;
    info!("Using {} market data at {}", yahoo.name(), config.yahoo_base_url);
    let market_data: Arc<dyn MarketDataSource> = Arc::new(yahoo);

    let addr = config.bind_addr();
    let app = augur::app(AppState::new(config, market_data));

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Augur server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
