// Import: spreadsheet rows -> bulk update payload -> localisation service
//
// Nothing leaves the machine while `dry_run` is true. The flag is read from
// the config file only.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lokal_client::{AuthHeaders, LocalisationClient};
use lokal_config::{resolve_credentials, Config};
use lokal_recon::{build_payload, collect_rows, diff};

use crate::CliError;

/// What the upload dispatcher did.
#[derive(Debug)]
pub enum ImportOutcome {
    DryRun {
        items: usize,
        payload_file: Option<PathBuf>,
    },
    Sent {
        items: usize,
        backup: Option<PathBuf>,
        response: serde_json::Value,
    },
    /// `--changed-only` found every item already in place.
    NothingToSend,
}

pub fn cmd_import(
    config: &Config,
    config_path: Option<&Path>,
    input: Option<PathBuf>,
    payload_file: Option<PathBuf>,
    changed_only: bool,
) -> Result<(), CliError> {
    let input = input.unwrap_or_else(|| config.input_file.clone());
    let payload_file = payload_file.or_else(|| config.payload_file.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = run_import(config, &input, payload_file.as_deref(), changed_only, &mut out)?;

    match outcome {
        ImportOutcome::DryRun { items, payload_file } => {
            eprintln!();
            eprintln!("dry run: {} items NOT sent to {}", items, config.update_url());
            if let Some(path) = payload_file {
                eprintln!("payload written to {}", path.display());
            }
            let where_ = config_path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the config file".to_string());
            eprintln!("Check the JSON above. If it looks right, set dry_run = false in {} and run again.", where_);
        }
        ImportOutcome::Sent { items, backup, .. } => {
            if let Some(path) = backup {
                eprintln!("previous state saved to {}", path.display());
            }
            eprintln!("sent {} items to {}", items, config.update_url());
        }
        ImportOutcome::NothingToSend => {
            eprintln!("nothing changed: {} already matches {}", config.update_url(), input.display());
        }
    }
    Ok(())
}

/// Read `input`, build the payload and either preview it or send it.
/// The payload (dry run) or the service response (live) goes to `out`.
///
/// With `changed_only`, items whose value already matches the update
/// environment are dropped first.
pub fn run_import(
    config: &Config,
    input: &Path,
    payload_file: Option<&Path>,
    changed_only: bool,
    out: &mut dyn Write,
) -> Result<ImportOutcome, CliError> {
    let rows = lokal_io::read_rows(input).map_err(|e| {
        CliError::io(e).with_hint("pass --input or set input_file in the config file")
    })?;
    let mut items = build_payload(&rows, &config.category, config.payload_order);
    log::info!("{} rows -> {} update items ({:?})", rows.len(), items.len(), config.payload_order);

    if !config.dry_run && items.is_empty() {
        return Err(CliError::io(format!("{}: no rows to send", input.display())));
    }

    if changed_only {
        let remote = crate::diff::fetch_remote(config)?;
        let changes = diff(&collect_rows(&rows), &remote);
        let pending = changes.pending();
        let before = items.len();
        items.retain(|item| pending.contains(&(item.key.as_str(), item.locale)));
        log::info!("{} of {} items differ from {}", items.len(), before, config.update_url());
    }

    if config.dry_run {
        let body = lokal_io::json::payload_to_string(&items).map_err(CliError::io)?;
        writeln!(out, "{}", body).map_err(|e| CliError::io(e.to_string()))?;

        if let Some(path) = payload_file {
            lokal_io::json::write_payload(path, &items).map_err(CliError::io)?;
        }
        return Ok(ImportOutcome::DryRun {
            items: items.len(),
            payload_file: payload_file.map(Path::to_path_buf),
        });
    }

    if items.is_empty() {
        return Ok(ImportOutcome::NothingToSend);
    }

    let credentials = resolve_credentials(config).map_err(CliError::config)?;
    let auth = AuthHeaders {
        caller_id: credentials.caller_id,
        csrf: credentials.csrf,
        session: credentials.session,
    };

    let client = LocalisationClient::new(config.update_url(), Duration::from_secs(config.timeout_secs))
        .map_err(CliError::client)?;

    let backup = match &config.backup_dir {
        Some(dir) => {
            let current = client.fetch_category_raw(&config.category).map_err(CliError::client)?;
            let path = lokal_io::json::write_backup(dir, &config.category, &current).map_err(CliError::io)?;
            log::info!("backed up {} records to {}", current.len(), path.display());
            Some(path)
        }
        None => None,
    };

    let response = client.update(&items, &auth).map_err(CliError::client)?;
    let pretty = serde_json::to_string_pretty(&response).map_err(|e| CliError::io(e.to_string()))?;
    writeln!(out, "{}", pretty).map_err(|e| CliError::io(e.to_string()))?;

    Ok(ImportOutcome::Sent {
        items: items.len(),
        backup,
        response,
    })
}
