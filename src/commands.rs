use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use std::io;
use tracing::{error, info};

use crate::config::{Config, SearchConfig};
use crate::corpus::{CacheFile, CorpusBuilder, CorpusOrigin};
use crate::search::SearchHit;
use crate::session::SearchSession;

#[cfg(test)]
mod tests;

const QUIT_COMMANDS: &[&str] = &[":q", ":quit", ":exit"];
const REFRESH_COMMAND: &str = ":refresh";

/// Answer a single query and exit
#[inline]
pub async fn search_once(
    config: Config,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    if let Some(limit) = limit {
        SearchConfig::validate_top_k(limit)?;
    }

    let session = SearchSession::initialize(config).await?;
    let limit = limit.unwrap_or(session.config().search.top_k);

    let Some(hits) = session.handle_query_with_limit(query, limit)? else {
        info!("Empty query, nothing to search");
        return Ok(());
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&hits).context("Failed to serialize results")?
        );
    } else {
        print_hits(&hits);
    }

    Ok(())
}

/// Prompt for queries until the user quits
#[inline]
pub async fn run_interactive(config: Config) -> Result<()> {
    let mut session = SearchSession::initialize(config).await?;

    eprintln!("{}", style("📘 Universal FAQ Search").bold().cyan());
    eprintln!("Ask questions like 'How to apply for IPO' or 'How to place a bracket order'.");
    print_corpus_summary(&session);
    eprintln!(
        "{}",
        style(format!(
            "Type {} to re-scrape the site, {} to exit.",
            REFRESH_COMMAND, QUIT_COMMANDS[1]
        ))
        .dim()
    );
    eprintln!();

    let mut piped_lines = (!console::user_attended()).then(|| io::stdin().lines());

    loop {
        let line = match piped_lines.as_mut() {
            Some(lines) => match lines.next() {
                Some(line) => line?,
                None => break,
            },
            None => Input::<String>::new()
                .with_prompt("Your question")
                .allow_empty(true)
                .interact_text()?,
        };
        let line = line.trim();

        if QUIT_COMMANDS.contains(&line) {
            break;
        }

        if line == REFRESH_COMMAND {
            match session.refresh().await {
                Ok(()) => print_corpus_summary(&session),
                Err(e) => {
                    error!("Refresh failed: {}", e);
                    eprintln!("{} {}", style("Refresh failed:").red(), e);
                }
            }
            continue;
        }

        if let Some(hits) = session.handle_query(line)? {
            print_hits(&hits);
        }
    }

    Ok(())
}

/// Force a live scrape and rewrite the cache. Nothing is embedded.
#[inline]
pub async fn refresh_corpus(config: &Config) -> Result<()> {
    let corpus = CorpusBuilder::new(config).build(true).await?;

    match corpus.origin() {
        CorpusOrigin::Live if config.cache.enabled => println!(
            "Scraped {} FAQs and cached them to {}",
            corpus.len(),
            config.cache_file_path().display()
        ),
        CorpusOrigin::Live => println!("Scraped {} FAQs (cache disabled)", corpus.len()),
        CorpusOrigin::Cache | CorpusOrigin::Fallback => {
            eprintln!(
                "{}",
                style("⚠ No FAQs found from the live site. The cache was left unchanged.")
                    .yellow()
            );
        }
    }

    Ok(())
}

/// Show configuration and cache state without touching the network
#[inline]
pub fn show_status(config: &Config) -> Result<()> {
    println!("FAQ Search Status");
    println!();
    println!("Seed URL: {}", config.scraper.seed_url);
    println!(
        "Embedding: {} ({})",
        config.embedding.provider, config.embedding.model
    );
    println!(
        "Search: top {} by {} similarity",
        config.search.top_k, config.search.metric
    );
    println!();

    if !config.cache.enabled {
        println!("Cache: disabled");
        return Ok(());
    }

    let status = CacheFile::new(config.cache_file_path()).status();
    println!("Cache file: {}", status.path.display());
    if !status.exists {
        println!("  Not present. The next search will scrape the site.");
        return Ok(());
    }

    if let Some(modified) = status.modified {
        println!("  Last written: {}", modified.format("%Y-%m-%d %H:%M:%S"));
    }
    match status.rows {
        Some(rows) => println!("  FAQs: {}", rows),
        None => println!("  {}", style("Unreadable or missing a 'question' column").red()),
    }
    match config.cache.ttl_hours {
        Some(hours) => println!("  Expires after: {}h", hours),
        None => println!("  Expires: never"),
    }

    Ok(())
}

fn print_corpus_summary(session: &SearchSession) {
    let origin = session.origin();
    let message = format!("FAQ count: {} (from {})", session.len(), origin);
    match origin {
        CorpusOrigin::Fallback => eprintln!(
            "{}",
            style(format!(
                "⚠ No FAQs found from the live site. Loading fallback demo data. {}",
                message
            ))
            .yellow()
        ),
        CorpusOrigin::Cache => eprintln!(
            "{}",
            style(format!("Loaded cached FAQ data from previous scrape. {}", message)).cyan()
        ),
        CorpusOrigin::Live => eprintln!("{}", style(message).green()),
    }
}

fn print_hits(hits: &[SearchHit]) {
    println!("{}", style("Top results:").bold());
    for hit in hits {
        println!();
        println!("{}", style(format!("Q: {}", hit.record.question)).bold());
        if !hit.record.answer.is_empty() {
            println!("{}", hit.record.answer);
        }
        if !hit.record.url.is_empty() {
            println!("Read more: {}", style(&hit.record.url).cyan().underlined());
        }
        println!("{}", style(format!("score {:.4}", hit.score)).dim());
        println!("---");
    }
}
