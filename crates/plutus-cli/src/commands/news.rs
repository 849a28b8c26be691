use anyhow::{bail, Result};
use chrono::Local;
use tokio::task::JoinSet;

use plutus_core::{
    feed::{sort_newest_first, ArticleRecord, FeedParser},
    insight::{InsightClient, Sentiment},
    AppConfig,
};

pub struct NewsOptions {
    pub url: Option<String>,
    pub limit: usize,
    pub sentiment: bool,
    pub json: bool,
    pub details: bool,
    pub open: Option<usize>,
}

pub async fn run(config: &AppConfig, options: NewsOptions) -> Result<()> {
    let parser = match options.url {
        Some(ref url) => FeedParser::new(url)?,
        None => FeedParser::from_config(config)?,
    };

    tracing::info!("Loading news from {}", parser.url());

    let mut articles = parser.parse().await?;
    sort_newest_first(&mut articles);
    articles.truncate(options.limit);

    if let Some(position) = options.open {
        let Some(article) = position.checked_sub(1).and_then(|i| articles.get(i)) else {
            bail!("No article at position {} ({} shown)", position, articles.len());
        };
        println!("Opening: {}", article.headline());
        open::that(&article.link)?;
        return Ok(());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }

    if articles.is_empty() {
        println!("No articles in feed.");
        return Ok(());
    }

    let sentiments = if options.sentiment && config.ai.enabled {
        fetch_sentiments(config, &articles).await?
    } else {
        vec![None; articles.len()]
    };

    for (index, (article, sentiment)) in articles.iter().zip(sentiments).enumerate() {
        print_article(index + 1, article, sentiment, options.details);
    }

    Ok(())
}

/// Look up sentiment for every headline concurrently, keeping article order
async fn fetch_sentiments(
    config: &AppConfig,
    articles: &[ArticleRecord],
) -> Result<Vec<Option<std::result::Result<Sentiment, String>>>> {
    let client = InsightClient::from_config(config)?;
    let mut join_set = JoinSet::new();

    for (index, article) in articles.iter().enumerate() {
        let client = client.clone();
        let headline = article.headline().to_string();
        join_set.spawn(async move {
            let result = client.sentiment(&headline).await.map_err(|e| e.to_string());
            (index, result)
        });
    }

    let mut results = vec![None; articles.len()];
    while let Some(joined) = join_set.join_next().await {
        let (index, result) = joined?;
        results[index] = Some(result);
    }

    Ok(results)
}

fn print_article(
    position: usize,
    article: &ArticleRecord,
    sentiment: Option<std::result::Result<Sentiment, String>>,
    details: bool,
) {
    println!("{:>3}. {}", position, article.headline());

    let published = article
        .published_at()
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| article.published_date.clone());
    println!("     {}  |  {} <{}>", published, article.source_name, article.source_url);
    println!("     {}", article.link);

    if details {
        for line in article.description_text(72).lines().filter(|l| !l.trim().is_empty()) {
            println!("     {}", line);
        }
    }

    match sentiment {
        Some(Ok(s)) => println!(
            "     Sentiment: {} ({:.2}% confident)",
            s.sentiment,
            s.confidence_percent()
        ),
        Some(Err(e)) => println!("     Error loading sentiment: {}", e),
        None => {}
    }

    println!();
}
