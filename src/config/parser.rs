use crate::config::types::{Config, EnrichmentConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use job_sieve::config::load_config;
///
/// let config = load_config(Path::new("job-sieve.toml")).unwrap();
/// println!("Max pages: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be told apart by the settings they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Resolves the classifier API key from the environment
///
/// A `.env` file in the working directory is loaded first when present.
/// Returns `Ok(None)` in dry-run mode, where no key is needed.
pub fn resolve_api_key(config: &EnrichmentConfig) -> Result<Option<String>, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(ConfigError::Validation(format!(
                "Failed to load .env file: {}",
                e
            )));
        }
    }

    let key = std::env::var(&config.api_key_env)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match key {
        Some(key) => Ok(Some(key)),
        None if config.dry_run => Ok(None),
        None => Err(ConfigError::MissingApiKey(config.api_key_env.clone())),
    }
}
