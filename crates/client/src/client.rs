//! Localisation service HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).

use std::time::Duration;

use lokal_recon::{Locale, TranslationRecord, UploadItem};
use serde::de::DeserializeOwned;

/// Localisation service API client (blocking).
#[derive(Clone)]
pub struct LocalisationClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

/// Error type for service operations.
#[derive(Debug)]
pub enum ClientError {
    /// HTTP client could not be constructed
    Setup(String),
    /// Network error (DNS, connect, timeout, TLS)
    Network(String),
    /// HTTP error with status code and response body (redirect target for 3xx)
    Http(u16, String),
    /// Response body was not the expected JSON
    Parse(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Setup(msg) => write!(f, "HTTP client setup failed: {}", msg),
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Http(code, msg) if msg.is_empty() => write!(f, "HTTP {}", code),
            ClientError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ClientError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// Headers the update endpoint requires from a logged-in virkailija session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub caller_id: String,
    pub csrf: String,
    pub session: String,
}

impl AuthHeaders {
    fn cookie(&self) -> String {
        format!("JSESSIONID={}; CSRF={}", self.session, self.csrf)
    }
}

impl LocalisationClient {
    /// Create a client for `api_base`, e.g.
    /// `https://virkailija.testiopintopolku.fi/lokalisointi/cxf/rest/v1`.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("lokal/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            // An expired session is answered with a redirect to the CAS login page
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Every translation record of `category`.
    pub fn fetch_category(&self, category: &str) -> Result<Vec<TranslationRecord>, ClientError> {
        self.get_json(&[("category", category)])
    }

    /// Every record of `category` exactly as the service returns it, ids and
    /// timestamps included.
    pub fn fetch_category_raw(&self, category: &str) -> Result<Vec<serde_json::Value>, ClientError> {
        self.get_json(&[("category", category)])
    }

    /// Records of a single key, optionally restricted to one locale.
    pub fn fetch_key(
        &self,
        category: &str,
        key: &str,
        locale: Option<Locale>,
    ) -> Result<Vec<TranslationRecord>, ClientError> {
        let mut query = vec![("category", category), ("key", key)];
        if let Some(locale) = locale {
            query.push(("locale", locale.as_str()));
        }
        self.get_json(&query)
    }

    fn get_json<T: DeserializeOwned>(&self, query: &[(&str, &str)]) -> Result<Vec<T>, ClientError> {
        let url = format!("{}/localisation", self.api_base);
        log::info!("GET {} {:?}", url, query);

        let response = self.http.get(&url)
            .query(query)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let response = check_status(response)?;
        let records: Vec<T> = response.json()
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        log::info!("received {} records", records.len());
        Ok(records)
    }

    /// Bulk update. Returns the response body as JSON, or `Null` when the
    /// service answers with an empty body.
    pub fn update(&self, items: &[UploadItem], auth: &AuthHeaders) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/localisation/update", self.api_base);
        log::info!("POST {} ({} items)", url, items.len());

        let response = self.http.post(&url)
            .header("Accept", "application/json, text/plain, */*")
            .header("caller-id", &auth.caller_id)
            .header("csrf", &auth.csrf)
            .header("Cookie", auth.cookie())
            .json(items)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let response = check_status(response)?;
        let body = response.text().map_err(|e| ClientError::Network(e.to_string()))?;

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| {
            log::debug!("update response is not JSON: {}", body);
            ClientError::Parse(format!("update response is not JSON: {}", e))
        })
    }
}

fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ClientError> {
    let status = response.status().as_u16();
    if response.status().is_redirection() {
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        log::warn!("service redirected HTTP {} to '{}'", status, location);
        return Err(ClientError::Http(status, location));
    }
    if !response.status().is_success() {
        let body = response.text().unwrap_or_default();
        log::warn!("service returned HTTP {}", status);
        return Err(ClientError::Http(status, body));
    }
    Ok(response)
}
