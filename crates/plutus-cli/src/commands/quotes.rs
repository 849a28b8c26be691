use std::collections::HashMap;

use anyhow::Result;
use tokio::task::JoinSet;

use plutus_core::{
    market::{CommodityQuote, QuoteClient},
    AppConfig,
};

pub async fn run(config: &AppConfig) -> Result<()> {
    let client = QuoteClient::from_config(config)?;
    let commodities = &config.market.commodities;

    if commodities.is_empty() {
        println!("No commodities configured.");
        println!("\nAdd some to [market] commodities in {}", AppConfig::config_path().display());
        return Ok(());
    }

    let mut join_set = JoinSet::new();
    for &commodity in commodities {
        let client = client.clone();
        join_set.spawn(async move { (commodity, client.quote(commodity).await) });
    }

    let mut results = HashMap::new();
    while let Some(joined) = join_set.join_next().await {
        let (commodity, result) = joined?;
        results.insert(commodity, result);
    }

    println!("Market overview ({} commodities):\n", commodities.len());

    for commodity in commodities {
        match results.remove(commodity) {
            Some(Ok(quote)) => println!("  {}", format_quote(commodity.name(), commodity.ticker(), &quote)),
            Some(Err(e)) => println!("  {:<8} {:<6} [ERROR: {}]", commodity.name(), commodity.ticker(), e),
            None => {}
        }
    }

    Ok(())
}

pub fn format_quote(name: &str, ticker: &str, quote: &CommodityQuote) -> String {
    format!(
        "{:<8} {:<6} {:>10.2}  {} {:+.2}%  {}",
        name,
        ticker,
        quote.regular_market_price,
        quote.trend().symbol(),
        quote.regular_market_change_percent,
        quote.short_name
    )
}
