
use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::path::Path;

use super::{Config, ConfigError, EmbeddingConfig, EmbeddingProviderKind, ScraperConfig};
use crate::search::SimilarityMetric;

#[inline]
pub fn run_interactive_config(config_dir: &Path) -> Result<()> {
    eprintln!("{}", style("🔧 FAQ Search Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config(config_dir);

    eprintln!("{}", style("FAQ Source").bold().yellow());
    eprintln!("The support page FAQ sub-pages are discovered from.");
    eprintln!();
    configure_scraper(&mut config.scraper)?;

    eprintln!();
    eprintln!("{}", style("Embedding Model").bold().yellow());
    configure_embedding(&mut config.embedding)?;

    if config.embedding.provider == EmbeddingProviderKind::Ollama {
        eprintln!();
        eprintln!("{}", style("Testing configuration...").yellow());

        if test_ollama_connection(&config.embedding) {
            eprintln!("{}", style("✓ Ollama connection successful!").green());
        } else {
            eprintln!(
                "{}",
                style("⚠ Warning: Could not connect to Ollama").yellow()
            );
            eprintln!("You can continue, but make sure Ollama is running before searching.");
        }
    }

    eprintln!();
    eprintln!("{}", style("Search").bold().yellow());
    configure_search(&mut config)?;

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config(config_dir: &Path) -> Result<()> {
    let config = Config::load(config_dir).context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Scraper Settings:").bold().yellow());
    eprintln!("  Seed URL: {}", style(&config.scraper.seed_url).cyan());
    eprintln!("  Link Marker: {}", style(&config.scraper.link_marker).cyan());
    eprintln!(
        "  Timeout: {}",
        style(format!("{}s", config.scraper.timeout_seconds)).cyan()
    );
    eprintln!(
        "  Min Question Words: {}",
        style(config.scraper.min_question_words).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Embedding Settings:").bold().yellow());
    eprintln!(
        "  Provider: {}",
        style(config.embedding.provider).cyan()
    );
    match config.embedding.provider {
        EmbeddingProviderKind::Ollama => {
            eprintln!("  Model: {}", style(&config.embedding.model).cyan());
            eprintln!(
                "  Batch Size: {}",
                style(config.embedding.batch_size).cyan()
            );
            match config.ollama_url() {
                Ok(url) => eprintln!("  Ollama URL: {}", style(url).cyan()),
                Err(e) => eprintln!("  Ollama URL: {} ({})", style("Invalid").red(), e),
            }
        }
        EmbeddingProviderKind::Hash => {
            eprintln!(
                "  Dimension: {}",
                style(config.embedding.embedding_dimension).cyan()
            );
        }
    }

    eprintln!();
    eprintln!("{}", style("Search Settings:").bold().yellow());
    eprintln!("  Top K: {}", style(config.search.top_k).cyan());
    eprintln!("  Metric: {}", style(config.search.metric).cyan());

    eprintln!();
    eprintln!("{}", style("Cache Settings:").bold().yellow());
    eprintln!("  Enabled: {}", style(config.cache.enabled).cyan());
    eprintln!(
        "  File: {}",
        style(config.cache_file_path().display()).cyan()
    );
    match config.cache.ttl_hours {
        Some(hours) => eprintln!("  TTL: {}", style(format!("{hours}h")).cyan()),
        None => eprintln!("  TTL: {}", style("none").dim()),
    }

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config(config_dir: &Path) -> Config {
    Config::load(config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Config {
                base_dir: config_dir.to_path_buf(),
                ..Config::default()
            }
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            config
        },
    )
}

fn configure_scraper(scraper: &mut ScraperConfig) -> Result<()> {
    let seed_url: String = Input::new()
        .with_prompt("Support page URL")
        .default(scraper.seed_url.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let temp_config = ScraperConfig {
                seed_url: input.clone(),
                ..ScraperConfig::default()
            };
            temp_config.validate()
        })
        .interact_text()?;

    let link_marker: String = Input::new()
        .with_prompt("Path marker for FAQ links")
        .default(scraper.link_marker.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Link marker cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    scraper.set_seed_url(seed_url)?;
    scraper.set_link_marker(link_marker)?;

    Ok(())
}

fn configure_embedding(embedding: &mut EmbeddingConfig) -> Result<()> {
    let providers = &["ollama", "hash"];
    let default_index = match embedding.provider {
        EmbeddingProviderKind::Ollama => 0,
        EmbeddingProviderKind::Hash => 1,
    };

    let provider_index = Select::new()
        .with_prompt("Embedding provider")
        .default(default_index)
        .items(providers)
        .interact()?;

    if provider_index == 1 {
        embedding.provider = EmbeddingProviderKind::Hash;
        return Ok(());
    }
    embedding.provider = EmbeddingProviderKind::Ollama;

    let protocols = &["http", "https"];
    let default_index = protocols
        .iter()
        .position(|&p| p == embedding.protocol)
        .unwrap_or(0);

    let protocol_index = Select::new()
        .with_prompt("Ollama protocol")
        .default(default_index)
        .items(protocols)
        .interact()?;

    let protocol = protocols[protocol_index].to_string();

    let host: String = Input::new()
        .with_prompt("Ollama host")
        .default(embedding.host.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let temp_config = EmbeddingConfig {
                protocol: protocol.clone(),
                host: input.clone(),
                ..EmbeddingConfig::default()
            };
            temp_config.validate()
        })
        .interact_text()?;

    let port: u16 = Input::new()
        .with_prompt("Ollama port")
        .default(embedding.port)
        .validate_with(|input: &u16| -> Result<(), &str> {
            if *input == 0 {
                Err("Port must be greater than 0")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let model: String = Input::new()
        .with_prompt("Embedding model")
        .default(embedding.model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    embedding.set_protocol(protocol)?;
    embedding.set_host(host)?;
    embedding.set_port(port)?;
    embedding.set_model(model)?;

    Ok(())
}

fn configure_search(config: &mut Config) -> Result<()> {
    let metrics = &[SimilarityMetric::Cosine, SimilarityMetric::Euclidean];
    let default_index = metrics
        .iter()
        .position(|&m| m == config.search.metric)
        .unwrap_or(0);

    let metric_index = Select::new()
        .with_prompt("Similarity metric")
        .default(default_index)
        .items(metrics)
        .interact()?;

    let top_k: usize = Input::new()
        .with_prompt("Results per query")
        .default(config.search.top_k)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if (1..=50).contains(input) {
                Ok(())
            } else {
                Err("Must be between 1 and 50")
            }
        })
        .interact_text()?;

    config.search.metric = metrics[metric_index];
    config.search.top_k = top_k;

    Ok(())
}

fn test_ollama_connection(embedding: &EmbeddingConfig) -> bool {
    let url = format!(
        "{}://{}:{}/api/version",
        embedding.protocol, embedding.host, embedding.port
    );

    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(std::time::Duration::from_secs(5)))
        .build()
        .into();

    match agent.get(&url).call() {
        Ok(_) => true,
        Err(ureq::Error::StatusCode(code)) if (400..500).contains(&code) => true,
        Err(_) => false,
    }
}
