use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Breakdowns, Config, Reports, Server};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, and returns it. A config file that is present but empty is fine:
/// every setting has a default.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads the configuration from an explicit path (used by the CLI's
/// `--config` flag and by tests).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Rejects settings that would make every breakdown view empty.
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.breakdowns.category_top_n == 0
        || config.breakdowns.state_top_n == 0
        || config.breakdowns.state_top_n_explore == 0
    {
        return Err(ConfigError::ValidationError(
            "breakdown top_n values must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
