use anyhow::Result;
use chrono::DateTime;

use plutus_core::{
    market::{Commodity, QuoteClient},
    AppConfig,
};

pub async fn run(
    config: &AppConfig,
    commodity: Commodity,
    range: Option<String>,
    interval: Option<String>,
) -> Result<()> {
    let client = QuoteClient::from_config(config)?;
    let range = range.unwrap_or_else(|| config.market.history_range.clone());
    let interval = interval.unwrap_or_else(|| config.market.history_interval.clone());

    let series = client.historical(commodity, &range, &interval).await?;

    if series.points.is_empty() {
        println!("No historical data for {} ({}).", commodity, commodity.ticker());
        return Ok(());
    }

    println!(
        "{} ({}) - {} bars, range {}, interval {}\n",
        commodity,
        commodity.ticker(),
        series.points.len(),
        range,
        interval
    );
    println!("  {:<16} {:>10} {:>10} {:>10} {:>10} {:>12}", "Time", "Open", "High", "Low", "Close", "Volume");

    for point in &series.points {
        let time = DateTime::from_timestamp(point.time, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| point.time.to_string());
        println!(
            "  {:<16} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12.0}",
            time, point.open, point.high, point.low, point.close, point.volume
        );
    }

    if let Some(change) = series.change_percent() {
        println!("\n  Change: {} {:+.2}%", series.trend().symbol(), change);
    }
    if let (Some(high), Some(low)) = (series.high(), series.low()) {
        println!("  High: {:.2}  Low: {:.2}", high, low);
    }

    Ok(())
}
