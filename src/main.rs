use clap::{Parser, Subcommand};
use faq_search::Result;
use faq_search::commands::{refresh_corpus, run_interactive, search_once, show_status};
use faq_search::config::{Config, get_config_dir, run_interactive_config, show_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "faq-search")]
#[command(about = "Semantic search over a support site's FAQ pages")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml and the FAQ cache
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the FAQs once and print the top matches
    Search {
        /// Free-text question
        query: String,
        /// Number of results (defaults to search.top_k)
        #[arg(long, short = 'k')]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Prompt for questions until `:quit`
    Interactive,
    /// Scrape the support site again and rewrite the cache
    Refresh,
    /// Show configuration and cache state
    Status,
    /// Configure the FAQ source, embedding model and search settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => get_config_dir().map_err(|e| faq_search::FaqError::Config(e.to_string()))?,
    };

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config(&config_dir)?;
            } else {
                run_interactive_config(&config_dir)?;
            }
        }
        Commands::Search { query, limit, json } => {
            search_once(Config::load(&config_dir)?, &query, limit, json).await?;
        }
        Commands::Interactive => {
            run_interactive(Config::load(&config_dir)?).await?;
        }
        Commands::Refresh => {
            refresh_corpus(&Config::load(&config_dir)?).await?;
        }
        Commands::Status => {
            show_status(&Config::load(&config_dir)?)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn search_command_with_query() {
        let cli = Cli::try_parse_from(["faq-search", "search", "apply for IPO"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Search { query, limit, json } = parsed.command {
                assert_eq!(query, "apply for IPO");
                assert_eq!(limit, None);
                assert!(!json);
            }
        }
    }

    #[test]
    fn search_command_with_options() {
        let cli = Cli::try_parse_from([
            "faq-search",
            "search",
            "bracket order",
            "-k",
            "3",
            "--json",
            "--config-dir",
            "/tmp/faq",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert_eq!(parsed.config_dir, Some(PathBuf::from("/tmp/faq")));
            if let Commands::Search { limit, json, .. } = parsed.command {
                assert_eq!(limit, Some(3));
                assert!(json);
            }
        }
    }

    #[test]
    fn search_requires_query() {
        let cli = Cli::try_parse_from(["faq-search", "search"]);
        assert!(cli.is_err());
    }

    #[test]
    fn interactive_command() {
        let cli = Cli::try_parse_from(["faq-search", "interactive"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert!(matches!(parsed.command, Commands::Interactive));
        }
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["faq-search", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["faq-search", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["faq-search", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
