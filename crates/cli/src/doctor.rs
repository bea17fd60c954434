// Doctor: print the configuration in effect. Secret values are never shown.

use std::path::Path;

use lokal_config::secrets::{self, Secret, SecretSource};
use lokal_config::Config;

use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SecretState {
    Ok,
    Placeholder,
    Missing,
}

impl SecretState {
    fn as_str(&self) -> &'static str {
        match self {
            SecretState::Ok => "ok",
            SecretState::Placeholder => "placeholder",
            SecretState::Missing => "missing",
        }
    }
}

struct SecretReport {
    secret: Secret,
    source: SecretSource,
    state: SecretState,
}

fn secret_reports(config: &Config) -> Vec<SecretReport> {
    Secret::ALL
        .iter()
        .map(|&secret| {
            let found = secrets::lookup(secret, &config.auth);
            let state = match found.value.as_deref() {
                None => SecretState::Missing,
                Some(v) if secrets::is_placeholder(v) => SecretState::Placeholder,
                Some(_) => SecretState::Ok,
            };
            SecretReport { secret, source: found.source, state }
        })
        .collect()
}

pub fn cmd_doctor(config: &Config, config_path: Option<&Path>, json: bool) -> Result<(), CliError> {
    let reports = secret_reports(config);
    let out = if json {
        render_json(config, config_path, &reports)?
    } else {
        render_text(config, config_path, &reports)
    };
    print!("{}", out);
    Ok(())
}

fn render_json(config: &Config, config_path: Option<&Path>, reports: &[SecretReport]) -> Result<String, CliError> {
    let mut secret_map = serde_json::Map::new();
    for r in reports {
        secret_map.insert(
            r.secret.name().into(),
            serde_json::json!({
                "source": r.source.as_str(),
                "state": r.state.as_str(),
                "env_var": r.secret.env_var(),
            }),
        );
    }

    let out = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "config_path": config_path.map(|p| p.display().to_string()),
        "config": config,
        "update_url": config.update_url(),
        "secrets": secret_map,
        "keychain_available": secrets::keychain_available(),
        "ready_to_send": !config.dry_run && reports.iter().all(|r| r.state == SecretState::Ok),
    });
    let mut body = serde_json::to_string_pretty(&out).map_err(|e| CliError::io(e.to_string()))?;
    body.push('\n');
    Ok(body)
}

fn render_text(config: &Config, config_path: Option<&Path>, reports: &[SecretReport]) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        out.push_str(&format!("{:<18}{}\n", label, value));
    };

    line(
        "config file:",
        config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none, using defaults)".to_string()),
    );
    line("read from:", config.service_base_url.clone());
    line("update to:", config.update_url().to_string());
    line("category:", config.category.clone());
    line("input file:", config.input_file.display().to_string());
    line("output file:", config.output_file.display().to_string());
    line("export filter:", config.export_filter.to_string());
    line("payload order:", format!("{:?}", config.payload_order));
    line("unknown locale:", format!("{:?}", config.unknown_locale));
    line(
        "dry run:",
        if config.dry_run { "yes (import only prints the payload)".into() } else { "NO (import sends)".into() },
    );
    if let Some(path) = &config.payload_file {
        line("payload file:", path.display().to_string());
    }
    if let Some(dir) = &config.backup_dir {
        line("backup dir:", dir.display().to_string());
    }
    line("timeout:", format!("{}s", config.timeout_secs));
    line("caller id:", config.auth.caller_id.clone());
    for r in reports {
        line(
            &format!("{}:", r.secret.name()),
            format!("{} ({}; env {})", r.state.as_str(), r.source.as_str(), r.secret.env_var()),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secrets() -> Config {
        let mut config = Config::default();
        config.auth.csrf = Some("very-secret-csrf".into());
        config.auth.session = Some("000000".into());
        config
    }

    #[test]
    fn test_text_hides_secret_values() {
        let config = config_with_secrets();
        let text = render_text(&config, None, &secret_reports(&config));
        assert!(!text.contains("very-secret-csrf"));
        assert!(text.contains("csrf:             ok (config; env LOKAL_CSRF)"));
        assert!(text.contains("session:          placeholder (config; env LOKAL_SESSION)"));
        assert!(text.contains("(none, using defaults)"));
    }

    #[test]
    fn test_json_report() {
        let config = config_with_secrets();
        let body = render_json(&config, Some(Path::new("/tmp/lokal.toml")), &secret_reports(&config)).unwrap();
        assert!(!body.contains("very-secret-csrf"));

        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["config_path"], "/tmp/lokal.toml");
        assert_eq!(value["config"]["category"], "ludos");
        assert_eq!(value["config"]["dry_run"], true);
        assert_eq!(value["secrets"]["csrf"]["source"], "config");
        assert_eq!(value["secrets"]["session"]["state"], "placeholder");
        assert_eq!(value["ready_to_send"], false);
    }
}
