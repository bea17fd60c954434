// List: show keys and values from the service or a spreadsheet

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lokal_client::LocalisationClient;
use lokal_config::Config;
use lokal_recon::{collect, collect_rows, stats, Locale, TranslationMap, TranslationStats};
use serde::Serialize;

use crate::CliError;

#[derive(Serialize)]
struct ListOutput<'a> {
    source: String,
    entries: Vec<ListEntry<'a>>,
    stats: TranslationStats,
}

#[derive(Serialize)]
struct ListEntry<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fi: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sv: Option<&'a str>,
}

pub fn cmd_list(
    config: &Config,
    input: Option<PathBuf>,
    key: Option<String>,
    locale: Option<Locale>,
    json: bool,
) -> Result<(), CliError> {
    let (source, entries) = load_entries(config, input.as_deref(), key.as_deref(), locale)?;

    if entries.is_empty() {
        if let Some(key) = &key {
            eprintln!("no translations match key '{}'", key);
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&mut out, &source, &entries, locale, json)
}

fn load_entries(
    config: &Config,
    input: Option<&Path>,
    key: Option<&str>,
    locale: Option<Locale>,
) -> Result<(String, TranslationMap), CliError> {
    if let Some(path) = input {
        if key.is_some() || locale.is_some() {
            return Err(CliError::args("--key and --locale only apply to the service, not to --input"));
        }
        let rows = lokal_io::read_rows(path).map_err(CliError::io)?;
        return Ok((path.display().to_string(), collect_rows(&rows)));
    }

    let client = LocalisationClient::new(&config.service_base_url, Duration::from_secs(config.timeout_secs))
        .map_err(CliError::client)?;
    let records = match key {
        Some(key) => client.fetch_key(&config.category, key, locale),
        None => client.fetch_category(&config.category),
    }
    .map_err(CliError::client)?;

    let collected = collect(&records, config.unknown_locale).map_err(CliError::recon)?;
    Ok((format!("{} ({})", client.api_base(), config.category), collected.entries))
}

fn render(
    out: &mut dyn Write,
    source: &str,
    entries: &TranslationMap,
    locale: Option<Locale>,
    json: bool,
) -> Result<(), CliError> {
    let shown = |l: Locale| locale.is_none() || locale == Some(l);

    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();

    let listed: Vec<ListEntry> = keys
        .into_iter()
        .map(|key| {
            let entry = &entries[key];
            ListEntry {
                key,
                fi: shown(Locale::Fi).then_some(entry.fi.as_str()),
                sv: shown(Locale::Sv).then_some(entry.sv.as_str()),
            }
        })
        .collect();
    let stats = stats(entries);

    let write_err = |e: std::io::Error| CliError::io(e.to_string());

    if json {
        let output = ListOutput { source: source.to_string(), entries: listed, stats };
        let body = serde_json::to_string_pretty(&output).map_err(|e| CliError::io(e.to_string()))?;
        writeln!(out, "{}", body).map_err(write_err)?;
        return Ok(());
    }

    for entry in &listed {
        writeln!(out, "{}:", entry.key).map_err(write_err)?;
        for (code, value) in [("fi", entry.fi), ("sv", entry.sv)] {
            if let Some(value) = value {
                writeln!(out, "  {}: \"{}\"", code, value).map_err(write_err)?;
            }
        }
    }
    writeln!(out).map_err(write_err)?;
    writeln!(out, "Source: {}", source).map_err(write_err)?;
    writeln!(
        out,
        "Stats:  {} keys, {} fi, {} sv, {} missing sv",
        stats.keys, stats.fi, stats.sv, stats.missing_sv
    )
    .map_err(write_err)?;
    Ok(())
}
