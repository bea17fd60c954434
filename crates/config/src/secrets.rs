// Update endpoint credentials
//
// The CSRF token and session id are looked up in order:
// 1. config file ([auth] csrf / session)
// 2. environment variables (LOKAL_CSRF, LOKAL_SESSION)
// 3. system keychain (only with the `keychain` feature)

use std::env;
use std::fmt;

use crate::settings::{AuthConfig, Config};
use crate::ConfigError;

/// Service name for keychain storage
#[cfg(feature = "keychain")]
const KEYCHAIN_SERVICE: &str = "lokal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secret {
    Csrf,
    Session,
}

impl Secret {
    pub const ALL: [Secret; 2] = [Secret::Csrf, Secret::Session];

    pub fn name(&self) -> &'static str {
        match self {
            Secret::Csrf => "csrf",
            Secret::Session => "session",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Secret::Csrf => "LOKAL_CSRF",
            Secret::Session => "LOKAL_SESSION",
        }
    }

    fn from_config<'a>(&self, auth: &'a AuthConfig) -> Option<&'a str> {
        match self {
            Secret::Csrf => auth.csrf.as_deref(),
            Secret::Session => auth.session.as_deref(),
        }
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a secret was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Config,
    Environment,
    Keychain,
    None,
}

impl SecretSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretSource::Config => "config",
            SecretSource::Environment => "environment",
            SecretSource::Keychain => "keychain",
            SecretSource::None => "none",
        }
    }
}

/// Result of a secret lookup
#[derive(Debug, Clone)]
pub struct SecretLookup {
    pub value: Option<String>,
    pub source: SecretSource,
}

/// Everything the update endpoint needs besides the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub caller_id: String,
    pub csrf: String,
    pub session: String,
}

/// Look a secret up in config, environment, then keychain.
pub fn lookup(secret: Secret, auth: &AuthConfig) -> SecretLookup {
    lookup_with(secret, auth, |name| env::var(name).ok())
}

fn lookup_with(secret: Secret, auth: &AuthConfig, env_var: impl Fn(&str) -> Option<String>) -> SecretLookup {
    if let Some(value) = secret.from_config(auth).filter(|v| !v.is_empty()) {
        return SecretLookup {
            value: Some(value.to_string()),
            source: SecretSource::Config,
        };
    }

    if let Some(value) = env_var(secret.env_var()).filter(|v| !v.is_empty()) {
        return SecretLookup {
            value: Some(value),
            source: SecretSource::Environment,
        };
    }

    #[cfg(feature = "keychain")]
    {
        if let Ok(entry) = keyring::Entry::new(KEYCHAIN_SERVICE, secret.name()) {
            if let Ok(value) = entry.get_password() {
                return SecretLookup {
                    value: Some(value),
                    source: SecretSource::Keychain,
                };
            }
        }
    }

    SecretLookup {
        value: None,
        source: SecretSource::None,
    }
}

/// Resolve the update endpoint credentials, failing on missing or
/// placeholder values.
pub fn resolve_credentials(config: &Config) -> Result<Credentials, ConfigError> {
    resolve_with(config, |name| env::var(name).ok())
}

fn resolve_with(config: &Config, env_var: impl Fn(&str) -> Option<String>) -> Result<Credentials, ConfigError> {
    let mut missing = Vec::new();
    let mut values = Vec::new();

    for secret in Secret::ALL {
        let found = lookup_with(secret, &config.auth, &env_var);
        match found.value {
            Some(value) if is_placeholder(&value) => {
                return Err(ConfigError::PlaceholderCredential(secret));
            }
            Some(value) => {
                log::debug!("{} from {}", secret, found.source.as_str());
                values.push(value);
            }
            None => missing.push(secret),
        }
    }

    if !missing.is_empty() {
        return Err(ConfigError::MissingCredentials(missing));
    }

    let session = values.pop().unwrap_or_default();
    let csrf = values.pop().unwrap_or_default();
    Ok(Credentials {
        caller_id: config.auth.caller_id.clone(),
        csrf,
        session,
    })
}

/// The example config ships with all-zero tokens.
pub fn is_placeholder(value: &str) -> bool {
    value.chars().all(|c| c == '0')
}

/// Store a secret in the system keychain
#[cfg(feature = "keychain")]
pub fn set_secret(secret: Secret, value: &str) -> Result<(), String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, secret.name())
        .map_err(|e| format!("Failed to create keychain entry: {}", e))?;

    entry
        .set_password(value)
        .map_err(|e| format!("Failed to store {} in keychain: {}", secret, e))
}

#[cfg(not(feature = "keychain"))]
pub fn set_secret(secret: Secret, _value: &str) -> Result<(), String> {
    Err(format!(
        "Keychain support not enabled. Set {} or [auth] {} in the config file instead.",
        secret.env_var(),
        secret.name()
    ))
}

/// Delete a secret from the system keychain
#[cfg(feature = "keychain")]
pub fn delete_secret(secret: Secret) -> Result<(), String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, secret.name())
        .map_err(|e| format!("Failed to access keychain entry: {}", e))?;

    entry
        .delete_credential()
        .map_err(|e| format!("Failed to delete {} from keychain: {}", secret, e))
}

#[cfg(not(feature = "keychain"))]
pub fn delete_secret(_secret: Secret) -> Result<(), String> {
    Err("Keychain support not enabled.".to_string())
}

/// Check if keychain support is available
pub fn keychain_available() -> bool {
    #[cfg(feature = "keychain")]
    {
        keyring::Entry::new(KEYCHAIN_SERVICE, "availability-check").is_ok()
    }
    #[cfg(not(feature = "keychain"))]
    {
        false
    }
}
