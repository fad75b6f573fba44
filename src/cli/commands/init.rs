//! Initialize command.

use console::style;

use super::super::helpers::open_database;
use snapprice::config::Settings;

/// Create the database tables.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    let ctx = open_database(settings).await?;

    for table in ctx.list_tables().await? {
        println!("  {} {}", style("✓").green(), table);
    }
    println!(
        "{} Initialized database at {}",
        style("✓").green(),
        ctx.pool().database_url()
    );

    Ok(())
}
