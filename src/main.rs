use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "netls=info,netls_core=info,sea_orm=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = netls::Config::from_env()?;
    netls::serve(config).await
}
