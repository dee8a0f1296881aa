//! HTTP transport for the netls services.
//!
//! Every route lives under `<api_prefix>/netls` and answers HTTP 200 with a
//! `{code, message, data}` envelope; see [`response::Envelope`].

pub mod config;
pub mod response;
mod routes;

use axum::Router;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

pub use config::Config;
pub use routes::{Operator, OPERATOR_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub conn: DatabaseConnection,
    /// Page size used when a list request does not name one.
    pub page_size: u64,
}

/// Builds the application router with every route mounted under
/// `<api_prefix>/netls`.
pub fn app(state: AppState, api_prefix: &str) -> Router {
    let base = format!("{}/netls", api_prefix.trim_end_matches('/'));
    Router::new()
        .nest(&base, routes::router())
        .with_state(state)
}

/// Connects to the database, applies pending migrations and serves until
/// the listener fails.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let conn = Database::connect(config.database_url.as_str()).await?;
    Migrator::up(&conn, None).await?;

    let addr = config.listen_addr()?;
    let state = AppState {
        conn,
        page_size: config.default_page_size,
    };
    let app = app(state, &config.api_prefix);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, prefix = %config.api_prefix, "netls listening");
    axum::serve(listener, app).await?;

    Ok(())
}
