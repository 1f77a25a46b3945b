// Configuration management module
// TOML settings plus the interactive setup prompts

pub mod interactive;
pub mod settings;


pub use interactive::{run_interactive_config, show_config};
pub use settings::{
    CacheConfig, Config, ConfigError, EmbeddingConfig, EmbeddingProviderKind, ScraperConfig,
    SearchConfig,
};

/// Get the configuration directory path
#[inline]
pub fn get_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    Config::default_dir()
}
