// Export: download a category and write the keys that need translating

use std::path::{Path, PathBuf};
use std::time::Duration;

use lokal_client::LocalisationClient;
use lokal_config::Config;
use lokal_recon::{classify, collect, ExportFilter};

use crate::CliError;

/// Counts reported after an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub records: usize,
    pub keys: usize,
    pub skipped: usize,
    pub written: usize,
    pub filter: ExportFilter,
}

pub fn cmd_export(config: &Config, output: Option<PathBuf>, all: bool) -> Result<(), CliError> {
    let filter = if all { ExportFilter::HasFinnish } else { config.export_filter };
    let output = output.unwrap_or_else(|| config.output_file.clone());

    let summary = run_export(config, filter, &output)?;

    eprintln!(
        "{} records, {} keys, {} written to {} ({})",
        summary.records,
        summary.keys,
        summary.written,
        output.display(),
        summary.filter,
    );
    if summary.skipped > 0 {
        eprintln!("warning: skipped {} records with an unsupported locale", summary.skipped);
    }
    Ok(())
}

pub fn run_export(config: &Config, filter: ExportFilter, output: &Path) -> Result<ExportSummary, CliError> {
    // Fail on a bad output name before touching the network.
    lokal_io::FileKind::from_path(output).map_err(CliError::args)?;

    let client = LocalisationClient::new(&config.service_base_url, Duration::from_secs(config.timeout_secs))
        .map_err(CliError::client)?;
    let records = client.fetch_category(&config.category).map_err(CliError::client)?;

    let collected = collect(&records, config.unknown_locale).map_err(CliError::recon)?;
    let selected = classify(&collected.entries, filter);
    log::info!(
        "{} of {} keys selected by {}",
        selected.len(),
        collected.entries.len(),
        filter
    );

    let written = lokal_io::write_entries(output, &selected, &config.sheet_name).map_err(CliError::io)?;

    Ok(ExportSummary {
        records: records.len(),
        keys: collected.entries.len(),
        skipped: collected.unknown_locale.len(),
        written,
        filter,
    })
}
