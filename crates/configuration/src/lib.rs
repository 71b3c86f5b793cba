use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DatabaseSettings};

/// The environment variable that carries the connection string.
pub const MONGO_URI_VAR: &str = "MONGO_URI";

/// Loads the application configuration from `config.toml`, `.env` and the environment.
///
/// `config.toml` is optional. `MONGO_URI` (from the process environment or `.env`)
/// always wins over `database.uri` from the file.
pub fn load_config() -> Result<Config, ConfigError> {
    // A missing .env file is fine; the variables may already be exported.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded.");
    }

    let mongo_uri = std::env::var(MONGO_URI_VAR).ok();
    build_config(
        config::File::with_name("config.toml").required(false),
        mongo_uri,
    )
}

/// Assembles the configuration from a file source plus an optional URI override.
pub fn build_config<S>(source: S, mongo_uri: Option<String>) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .set_default("database.name", "test")?
        .set_default("database.collection", "people")?
        .set_default("database.app_name", "people-store")?
        .set_default("database.server_selection_timeout_secs", 5_i64)?
        .set_default("database.connect_timeout_secs", 10_i64)?
        .add_source(source)
        .set_override_option("database.uri", mongo_uri)?
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    if config.database.uri.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} must be set (or `database.uri` in config.toml).",
            MONGO_URI_VAR
        )));
    }

    Ok(config)
}
