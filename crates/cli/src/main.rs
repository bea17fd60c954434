// lokal - sync LUDOS translations between spreadsheets and the localisation service

mod auth;
mod diff;
mod doctor;
mod exit_codes;
mod export;
mod import;
mod list;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lokal_client::ClientError;
use lokal_config::{Config, ConfigError};
use lokal_recon::{Locale, ReconError};

use exit_codes::{EXIT_DATA, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "lokal")]
#[command(about = "Sync translations between spreadsheets and the localisation service")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/lokal/config.toml if present)
    #[arg(long, global = true, env = "LOKAL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured category
    #[arg(long, global = true)]
    category: Option<String>,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download translations and write keys that need work to a spreadsheet
    #[command(after_help = "\
By default only keys with a Finnish value and no Swedish value are written.
Use --all (or export_filter = \"has_finnish\") for every key with a Finnish value.

Examples:
  lokal export
  lokal export --output puuttuvat_kaannokset.xlsx
  lokal export --all --output ludos_qa_kaannokset.xlsx
  lokal export --output review.csv")]
    Export {
        /// Spreadsheet to write (.xlsx, .csv or .tsv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Keep every key with a Finnish value, translated or not
        #[arg(long)]
        all: bool,
    },

    /// Read a spreadsheet of translations and build the bulk update
    #[command(after_help = "\
Columns are read by position: key, fi, sv. The first row is a header.

Nothing is sent while dry_run is true (the default): the payload is printed
for review instead. Set dry_run = false in the config file to send it.

Examples:
  lokal import
  lokal import --input ludos_qa_kaannokset.xlsx
  lokal import --input kaannokset.csv --payload-file payload.json
  lokal import --changed-only")]
    Import {
        /// Spreadsheet to read (.xlsx, .xls, .ods, .csv or .tsv)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Also write the dry-run payload to this file
        #[arg(long)]
        payload_file: Option<PathBuf>,

        /// Only send values that differ from the update environment
        #[arg(long)]
        changed_only: bool,
    },

    /// Compare a spreadsheet with the category in the update environment
    #[command(after_help = "\
Exits 0 when both sides match and 1 when they differ.

Examples:
  lokal diff
  lokal diff --input ludos_qa_kaannokset.xlsx
  lokal diff --input kaannokset.csv --json")]
    Diff {
        /// Spreadsheet to compare (.xlsx, .xls, .ods, .csv or .tsv)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Output as JSON for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Print keys and values with translation coverage
    #[command(after_help = "\
Examples:
  lokal list
  lokal list --key ludos.etusivu.otsikko
  lokal list --key ludos.etusivu.otsikko --locale sv
  lokal list --input ludos_qa_kaannokset.xlsx --json")]
    List {
        /// Read a spreadsheet instead of the service
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Only this key
        #[arg(long)]
        key: Option<String>,

        /// Only this locale (fi or sv)
        #[arg(long)]
        locale: Option<Locale>,

        /// Output as JSON for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Store the virkailija CSRF token and session id in the system keychain
    #[command(after_help = "\
Values not given as flags are prompted for. Needs a build with --features keychain.")]
    Login {
        #[arg(long)]
        csrf: Option<String>,

        /// JSESSIONID cookie value
        #[arg(long)]
        session: Option<String>,
    },

    /// Remove stored credentials from the system keychain
    Logout,

    /// Show the resolved configuration and where credentials come from
    Doctor {
        /// Output as JSON for machine parsing
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref(), cli.category).and_then(|(config, path)| {
        match cli.command {
            Commands::Export { output, all } => export::cmd_export(&config, output, all),
            Commands::Import { input, payload_file, changed_only } => {
                import::cmd_import(&config, path.as_deref(), input, payload_file, changed_only)
            }
            Commands::Diff { input, json } => diff::cmd_diff(&config, input, json),
            Commands::List { input, key, locale, json } => list::cmd_list(&config, input, key, locale, json),
            Commands::Login { csrf, session } => auth::cmd_login(csrf, session),
            Commands::Logout => auth::cmd_logout(),
            Commands::Doctor { json } => doctor::cmd_doctor(&config, path.as_deref(), json),
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Load the config named on the command line, or the default one, and apply
/// command-line overrides.
fn load_config(path: Option<&Path>, category: Option<String>) -> Result<(Config, Option<PathBuf>), CliError> {
    let (mut config, path) = match path {
        Some(p) => (Config::load(p).map_err(CliError::config)?, Some(p.to_path_buf())),
        None => Config::load_default().map_err(CliError::config)?,
    };

    if let Some(category) = category {
        config.category = category;
        config.validate().map_err(CliError::config)?;
    }

    Ok((config, path))
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        let code = exit_codes::config_exit_code(&err);
        let hint = match &err {
            ConfigError::MissingCredentials(_) | ConfigError::PlaceholderCredential(_) => Some(
                "copy JSESSIONID and CSRF from a logged-in virkailija session into \
                 LOKAL_SESSION / LOKAL_CSRF, or [auth] session / csrf in the config file"
                    .to_string(),
            ),
            ConfigError::Parse(_) | ConfigError::Validation(_) => {
                Some("run `lokal doctor` to see the configuration in effect".to_string())
            }
            ConfigError::Io(_) => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn client(err: ClientError) -> Self {
        let code = exit_codes::client_exit_code(&err);
        let hint = match &err {
            ClientError::Http(300..=399 | 401 | 403, _) => {
                Some("the virkailija session has probably expired; refresh the session and CSRF values".to_string())
            }
            ClientError::Network(_) => Some("check service_base_url / update_base_url".to_string()),
            _ => None,
        };
        Self { code, message: format!("localisation service: {}", err), hint }
    }

    pub fn recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::UnknownLocale { .. } => {
                Some("set unknown_locale = \"skip\" to ignore such records".to_string())
            }
        };
        Self { code: EXIT_DATA, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
