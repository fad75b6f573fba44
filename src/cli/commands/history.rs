//! History command.

use console::style;

use super::super::helpers::open_database;
use snapprice::config::Settings;

/// Print an item and its most recent price samples.
pub async fn cmd_history(settings: &Settings, source_id: &str, limit: usize) -> anyhow::Result<()> {
    let ctx = open_database(settings).await?;

    let Some(item) = ctx.items().find_by_source(source_id).await? else {
        println!("{} No item for source id {}", style("!").yellow(), source_id);
        return Ok(());
    };

    println!("{}", style(&item.title).bold());
    println!("  {}", item.link);
    for source in &item.sources {
        println!("  {}: {}", source.source, source.id);
    }
    println!("  updated {}", item.updated_at.to_rfc3339());

    let history = ctx
        .prices(&settings.currency, settings.freshness_window())
        .history(&item.id)
        .await?;
    if history.is_empty() {
        println!("  {}", style("no prices recorded").dim());
        return Ok(());
    }

    let shown = if limit == 0 { history.len() } else { limit };
    for sample in history.iter().take(shown) {
        println!(
            "  {}  {:>10.2} {}",
            sample.date.format("%Y-%m-%d %H:%M"),
            sample.price,
            sample.currency.to_uppercase()
        );
    }
    if history.len() > shown {
        println!("  {}", style(format!("... {} older", history.len() - shown)).dim());
    }

    Ok(())
}
