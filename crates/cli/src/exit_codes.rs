//! CLI Exit Code Registry
//!
//! Single source of truth for `lokal` exit codes. Wrapper scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain      | Description                                  |
//! |---------|-------------|----------------------------------------------|
//! | 0       | Universal   | Success (including dry runs)                 |
//! | 1       | Universal   | General error; `diff` found differences      |
//! | 2       | Universal   | CLI usage error (bad args)                   |
//! | 3-4     | Files       | Spreadsheet / JSON read and write            |
//! | 10-19   | config      | Config file and credentials                  |
//! | 20-29   | service     | Localisation service                         |

use lokal_client::ClientError;
use lokal_config::ConfigError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. clap exits with this code too.
pub const EXIT_USAGE: u8 = 2;

/// `lokal diff` found differences. Like `diff(1)`, exit 1 means "differ".
pub const EXIT_DIFF_FOUND: u8 = 1;

// =============================================================================
// Files (3-4)
// =============================================================================

/// Spreadsheet or JSON file could not be read or written.
pub const EXIT_IO: u8 = 3;

/// Input data rejected (e.g. unsupported locale under `unknown_locale = "fail"`).
pub const EXIT_DATA: u8 = 4;

// =============================================================================
// Config (10-19)
// =============================================================================

/// Config file missing, unparsable or invalid.
pub const EXIT_CONFIG: u8 = 10;

/// Update credentials missing or still placeholders.
pub const EXIT_CREDENTIALS: u8 = 11;

// =============================================================================
// Service (20-29)
// =============================================================================

/// Could not reach the localisation service.
pub const EXIT_SERVICE_NETWORK: u8 = 20;

/// Service answered with a non-2xx status.
pub const EXIT_SERVICE_HTTP: u8 = 21;

/// Service answered 2xx with a body that is not the expected JSON.
pub const EXIT_SERVICE_RESPONSE: u8 = 22;

/// Map a ConfigError to its exit code.
pub fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::Io(_) | ConfigError::Parse(_) | ConfigError::Validation(_) => EXIT_CONFIG,
        ConfigError::MissingCredentials(_) | ConfigError::PlaceholderCredential(_) => EXIT_CREDENTIALS,
    }
}

/// Map a ClientError to its exit code.
pub fn client_exit_code(err: &ClientError) -> u8 {
    match err {
        ClientError::Setup(_) => EXIT_ERROR,
        ClientError::Network(_) => EXIT_SERVICE_NETWORK,
        ClientError::Http(_, _) => EXIT_SERVICE_HTTP,
        ClientError::Parse(_) => EXIT_SERVICE_RESPONSE,
    }
}
