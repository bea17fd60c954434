// Sync settings
// Loaded from ~/.config/lokal/config.toml, or the file given with --config

use std::path::{Path, PathBuf};

use lokal_recon::{ExportFilter, PayloadOrder, UnknownLocalePolicy, DEFAULT_CATEGORY};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Localisation service of the QA (testiopintopolku) environment.
pub const DEFAULT_SERVICE_BASE_URL: &str = "https://virkailija.testiopintopolku.fi/lokalisointi/cxf/rest/v1";

/// Caller id the lokalisointi frontend identifies itself with.
pub const DEFAULT_CALLER_ID: &str = "1.2.246.562.10.00000000001.lokalisointi-frontend";

pub const DEFAULT_SPREADSHEET: &str = "puuttuvat_kaannokset.xlsx";

/// Excel limits sheet names to 31 characters.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Headers for the update endpoint. Secrets may also come from the
/// environment or the keychain, see [`crate::secrets`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub caller_id: String,

    #[serde(skip_serializing)]
    pub csrf: Option<String>,

    /// JSESSIONID of a logged-in virkailija session
    #[serde(skip_serializing)]
    pub session: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            caller_id: DEFAULT_CALLER_ID.to_string(),
            csrf: None,
            session: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL for reads, without trailing `/localisation`
    pub service_base_url: String,

    /// Base URL for the bulk update; falls back to `service_base_url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_base_url: Option<String>,

    pub category: String,

    /// Spreadsheet read by `import`
    pub input_file: PathBuf,

    /// Spreadsheet written by `export`
    pub output_file: PathBuf,

    pub sheet_name: String,

    pub export_filter: ExportFilter,

    pub payload_order: PayloadOrder,

    pub unknown_locale: UnknownLocalePolicy,

    /// When true, `import` only prints the payload. Must be switched off in
    /// the config file to send anything.
    pub dry_run: bool,

    /// Dry runs also write the payload here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_file: Option<PathBuf>,

    /// Live updates first save the current remote category here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    pub timeout_secs: u64,

    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_base_url: DEFAULT_SERVICE_BASE_URL.to_string(),
            update_base_url: None,
            category: DEFAULT_CATEGORY.to_string(),
            input_file: PathBuf::from(DEFAULT_SPREADSHEET),
            output_file: PathBuf::from(DEFAULT_SPREADSHEET),
            sheet_name: "translations".to_string(),
            export_filter: ExportFilter::default(),
            payload_order: PayloadOrder::default(),
            unknown_locale: UnknownLocalePolicy::default(),
            dry_run: true,
            payload_file: None,
            backup_dir: None,
            timeout_secs: 60,
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    /// Default config file location (~/.config/lokal/config.toml on Linux).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|c| c.join("lokal").join("config.toml"))
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file. The file must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&contents)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the default config file if it exists, defaults otherwise.
    /// Returns the path that was read, if any.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Ok((Self::load(&path)?, Some(path))),
            _ => {
                log::debug!("no config file, using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    /// Base URL for the bulk update endpoint.
    pub fn update_url(&self) -> &str {
        self.update_base_url.as_deref().unwrap_or(&self.service_base_url)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("service_base_url", &self.service_base_url)?;
        if let Some(url) = &self.update_base_url {
            validate_url("update_base_url", url)?;
        }

        if self.category.trim().is_empty() {
            return Err(ConfigError::Validation("category must not be empty".into()));
        }

        if self.sheet_name.is_empty() || self.sheet_name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(ConfigError::Validation(format!(
                "sheet_name must be 1-{} characters, got '{}'",
                MAX_SHEET_NAME_LEN, self.sheet_name
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation("timeout_secs must be greater than 0".into()));
        }

        if self.auth.caller_id.trim().is_empty() {
            return Err(ConfigError::Validation("auth.caller_id must not be empty".into()));
        }

        Ok(())
    }
}

fn validate_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must be an http(s) URL, got '{url}'"
        )))
    }
}
