//! Configuration error types.

/// Errors that abort loading a configuration source as a whole. Individual
/// malformed entries never produce these; they are reported in `Parsed::skipped`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// The source is not valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}
