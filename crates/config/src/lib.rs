// Configuration loading

pub mod secrets;
pub mod settings;

pub use secrets::{resolve_credentials, Credentials, Secret, SecretLookup, SecretSource};
pub use settings::{AuthConfig, Config};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read.
    Io(String),
    /// TOML parse / deserialization error.
    Parse(String),
    /// A value is present but unusable.
    Validation(String),
    /// Secrets needed for the update endpoint were not found anywhere.
    MissingCredentials(Vec<Secret>),
    /// A secret is still the all-zero placeholder from the example config.
    PlaceholderCredential(Secret),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "config read error: {msg}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingCredentials(missing) => {
                let names: Vec<&str> = missing.iter().map(|s| s.name()).collect();
                write!(f, "missing credentials: {}", names.join(", "))
            }
            Self::PlaceholderCredential(secret) => {
                write!(f, "{} is a placeholder, not a real credential", secret.name())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
