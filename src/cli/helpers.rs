//! Shared helper functions for CLI commands.

use anyhow::Context;
use tracing::info;

use snapprice::config::Settings;
use snapprice::repository::DbContext;

/// Connect to the configured database and make sure the schema exists.
///
/// Any failure here is fatal: nothing is crawled without a working store.
pub async fn open_database(settings: &Settings) -> anyhow::Result<DbContext> {
    let url = settings.database_url()?;
    let ctx = DbContext::from_url(url);

    ctx.ping()
        .await
        .with_context(|| format!("failed to connect to database at {}", url))?;
    ctx.init_schema()
        .await
        .context("failed to initialize database schema")?;

    info!("Connected to database at {}", ctx.pool().database_url());
    Ok(ctx)
}
