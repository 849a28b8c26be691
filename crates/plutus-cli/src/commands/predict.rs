use anyhow::{bail, Result};

use plutus_core::{
    insight::InsightClient,
    market::{change_percent, Commodity, QuoteClient, Trend},
    AppConfig,
};

pub async fn run(config: &AppConfig, commodity: Commodity) -> Result<()> {
    if !config.ai.enabled {
        bail!("Price predictions are disabled ([ai] enabled = false)");
    }

    let insights = InsightClient::from_config(config)?;
    let quotes = QuoteClient::from_config(config)?;

    let (prediction, quote) = tokio::join!(insights.price_prediction(commodity), quotes.quote(commodity));
    let prediction = prediction?;

    // The current price is only context; predictions are still shown without it
    let current = match quote {
        Ok(quote) => Some(quote.regular_market_price),
        Err(e) => {
            tracing::warn!("Could not load current price for {}: {}", commodity, e);
            None
        }
    };

    println!("{} ({}) price predictions:\n", commodity, commodity.ticker());
    if let Some(price) = current {
        println!("  {:<6} {:>10.2}", "Now", price);
    }

    let p = &prediction.predictions;
    for (label, predicted) in [("Day", p.day), ("Month", p.month), ("Year", p.year)] {
        match current.and_then(|price| change_percent(price, predicted)) {
            Some(change) => println!(
                "  {:<6} {:>10.2}  {} {:+.2}%",
                label,
                predicted,
                Trend::from_change(change).symbol(),
                change
            ),
            None => println!("  {:<6} {:>10.2}", label, predicted),
        }
    }

    Ok(())
}
