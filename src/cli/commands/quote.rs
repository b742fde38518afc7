//! Quote command implementation.

use anyhow::{bail, Context, Result};
use std::fmt::Write;
use stockscope_config::AppConfig;
use stockscope_core::traits::{Quote, QuoteSource};
use stockscope_data::JsonQuoteSource;
use tracing::info;

use crate::cli::{OutputFormat, QuoteArgs};

pub async fn run(args: QuoteArgs, config: &AppConfig) -> Result<()> {
    let dir = args.quotes.unwrap_or_else(|| config.data.quote_dir.clone());
    let source = JsonQuoteSource::new(&dir);

    let quote = source
        .latest_quote(&args.symbol)
        .await
        .with_context(|| format!("Failed to read quote for {}", args.symbol))?;
    let Some(quote) = quote else {
        bail!("No quote snapshot for {} in {}", args.symbol, dir.display());
    };

    info!(
        symbol = %quote.symbol,
        bids = quote.bids.len(),
        asks = quote.asks.len(),
        "Loaded quote snapshot"
    );

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quote)?),
        OutputFormat::Text => print!("{}", order_book_table(&quote)),
    }

    Ok(())
}

fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// Asks from the top of the book down, then bids, with spread and mid.
fn order_book_table(quote: &Quote) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order book for {} at {}", quote.symbol, quote.timestamp);
    let _ = writeln!(out, "═══════════════════════════════════");
    let _ = writeln!(out, "  {:<6} {:>12} {:>12}", "Side", "Price", "Volume");

    for (i, level) in quote.asks.iter().enumerate().rev() {
        let _ = writeln!(
            out,
            "  {:<6} {:>12.2} {:>12}",
            format!("ask{}", i + 1),
            level.price,
            level.volume
        );
    }
    let _ = writeln!(out, "  ─────────────────────────────────");
    for (i, level) in quote.bids.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:<6} {:>12.2} {:>12}",
            format!("bid{}", i + 1),
            level.price,
            level.volume
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  Last:   {}", price(quote.last));
    let _ = writeln!(out, "  Mid:    {}", price(quote.mid()));
    let _ = writeln!(
        out,
        "  Spread: {} ({})",
        price(quote.spread()),
        quote
            .spread_percent()
            .map_or_else(|| "-".to_string(), |p| format!("{:.3}%", p))
    );
    out
}
