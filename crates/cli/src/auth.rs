//! `lokal login` / `lokal logout`: keep the virkailija session in the
//! system keychain instead of the config file.

use std::io::{self, BufRead, IsTerminal, Write};

use lokal_config::secrets::{self, Secret};

use crate::exit_codes::*;
use crate::CliError;

pub fn cmd_login(csrf: Option<String>, session: Option<String>) -> Result<(), CliError> {
    if !secrets::keychain_available() {
        return Err(keychain_missing());
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut input = stdin.lock();

    for (secret, given) in [(Secret::Csrf, csrf), (Secret::Session, session)] {
        let value = match given {
            Some(v) => v,
            None if interactive => prompt(&mut input, secret)?,
            None => {
                return Err(CliError::args(format!("no {} given and stdin is not a TTY", secret))
                    .with_hint(format!("pass --{}", secret)));
            }
        };
        if value.is_empty() || secrets::is_placeholder(&value) {
            return Err(CliError {
                code: EXIT_CREDENTIALS,
                message: format!("{} is empty or a placeholder", secret),
                hint: None,
            });
        }
        secrets::set_secret(secret, &value).map_err(|e| CliError {
            code: EXIT_CREDENTIALS,
            message: e,
            hint: None,
        })?;
    }

    eprintln!("stored csrf and session in the keychain");
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    if !secrets::keychain_available() {
        return Err(keychain_missing());
    }
    for secret in Secret::ALL {
        // A secret that was never stored is not an error here.
        if let Err(e) = secrets::delete_secret(secret) {
            log::debug!("{}", e);
        }
    }
    eprintln!("removed csrf and session from the keychain");
    Ok(())
}

fn prompt(input: &mut impl BufRead, secret: Secret) -> Result<String, CliError> {
    eprint!("{}: ", secret);
    io::stderr().flush().ok();
    let mut buf = String::new();
    input
        .read_line(&mut buf)
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    Ok(buf.trim().to_string())
}

fn keychain_missing() -> CliError {
    CliError {
        code: EXIT_CREDENTIALS,
        message: "this build has no keychain support".into(),
        hint: Some("rebuild with --features keychain, or use LOKAL_CSRF / LOKAL_SESSION".into()),
    }
}
