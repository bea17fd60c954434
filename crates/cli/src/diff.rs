// Diff: compare a translation spreadsheet with the category in the
// update environment, before anything is sent.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lokal_client::LocalisationClient;
use lokal_config::Config;
use lokal_recon::{collect, collect_rows, diff, Diff, DiffStatus, TranslationMap};
use serde::Serialize;

use crate::exit_codes::EXIT_DIFF_FOUND;
use crate::CliError;

#[derive(Serialize)]
struct DiffOutput<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(flatten)]
    diff: &'a Diff,
}

pub fn cmd_diff(config: &Config, input: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let input = input.unwrap_or_else(|| config.input_file.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = run_diff(config, &input, json, &mut out)?;

    if !result.is_empty() {
        // Like diff(1): differences are reported, then exit 1.
        return Err(CliError { code: EXIT_DIFF_FOUND, message: String::new(), hint: None });
    }
    Ok(())
}

/// Diff `input` against the service and render the result to `out`.
pub fn run_diff(config: &Config, input: &Path, json: bool, out: &mut dyn Write) -> Result<Diff, CliError> {
    let rows = lokal_io::read_rows(input).map_err(|e| {
        CliError::io(e).with_hint("pass --input or set input_file in the config file")
    })?;
    let sheet = collect_rows(&rows);
    let remote = fetch_remote(config)?;

    let result = diff(&sheet, &remote);
    let from = input.display().to_string();
    let to = format!("{} ({})", config.update_url(), config.category);
    render(out, &from, &to, &result, json)?;
    Ok(result)
}

/// The configured category as currently stored in the update environment.
pub fn fetch_remote(config: &Config) -> Result<TranslationMap, CliError> {
    let client = LocalisationClient::new(config.update_url(), Duration::from_secs(config.timeout_secs))
        .map_err(CliError::client)?;
    let records = client.fetch_category(&config.category).map_err(CliError::client)?;
    let collected = collect(&records, config.unknown_locale).map_err(CliError::recon)?;
    Ok(collected.entries)
}

fn render(out: &mut dyn Write, from: &str, to: &str, result: &Diff, json: bool) -> Result<(), CliError> {
    let write_err = |e: std::io::Error| CliError::io(e.to_string());

    if json {
        let output = DiffOutput { from, to, diff: result };
        let body = serde_json::to_string_pretty(&output).map_err(|e| CliError::io(e.to_string()))?;
        writeln!(out, "{}", body).map_err(write_err)?;
        return Ok(());
    }

    let mut current: Option<&str> = None;
    for row in &result.rows {
        if current != Some(row.key.as_str()) {
            current = Some(row.key.as_str());
            let whole_key = result
                .rows
                .iter()
                .filter(|r| r.key == row.key)
                .map(|r| r.status)
                .collect::<Vec<_>>();
            match whole_key.as_slice() {
                [DiffStatus::OnlyInFrom, DiffStatus::OnlyInFrom] => {
                    writeln!(out, "{}: (only in {})", row.key, from).map_err(write_err)?
                }
                [DiffStatus::OnlyInTo, DiffStatus::OnlyInTo] => {
                    writeln!(out, "{}: (only in {})", row.key, to).map_err(write_err)?
                }
                _ => writeln!(out, "{}:", row.key).map_err(write_err)?,
            }
        }

        let from_value = row.from.as_deref().unwrap_or_default();
        let to_value = row.to.as_deref().unwrap_or_default();
        match row.status {
            DiffStatus::Changed => {
                writeln!(out, "  {}: \"{}\" => \"{}\"", row.locale, from_value, to_value)
            }
            DiffStatus::OnlyInFrom => writeln!(out, "  {}: \"{}\" (only in {})", row.locale, from_value, from),
            DiffStatus::OnlyInTo => writeln!(out, "  {}: \"{}\" (only in {})", row.locale, to_value, to),
        }
        .map_err(write_err)?;
    }

    let s = &result.stats;
    writeln!(out).map_err(write_err)?;
    writeln!(out, "From: {}", from).map_err(write_err)?;
    writeln!(out, "To:   {}", to).map_err(write_err)?;
    writeln!(
        out,
        "{} keys: {} changed, {} only in from, {} only in to, {} unchanged",
        s.keys, s.changed, s.only_in_from, s.only_in_to, s.unchanged
    )
    .map_err(write_err)?;
    Ok(())
}
