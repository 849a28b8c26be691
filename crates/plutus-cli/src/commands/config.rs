use anyhow::Result;

use plutus_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Configuration already exists: {}", path.display());
        } else {
            config.save()?;
            println!("Wrote default configuration to {}", path.display());
        }
        return Ok(());
    }

    println!("Configuration file: {}", path.display());
    if !path.exists() {
        println!("(not present, using defaults; run 'plutus config --init' to create it)");
    }
    println!();
    println!("  Feed:      {}", config.feed.feed_url()?);
    println!("  Quote API: {}", config.market.base_url);
    println!("  AI API:    {} ({})", config.ai.base_url, if config.ai.enabled { "enabled" } else { "disabled" });
    println!("  Polling:   every {}s", config.market.poll_interval_secs);

    let names: Vec<_> = config.market.commodities.iter().map(|c| c.name()).collect();
    println!("  Commodities: {}", names.join(", "));

    Ok(())
}
