use page_bundler::{AssetBundler, Config};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(Config::from_env()?);
    let bundler = Arc::new(AssetBundler::new(&config)?);

    page_bundler::api::start_api_server(bundler, config).await?;
    Ok(())
}
