// src/core/net.rs

// HTTPS GET with browser headers (blocking reqwest)

use std::{error::Error, time::Duration};

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_JSON: &str = "application/json,text/plain;q=0.9,*/*;q=0.8";

/// Page body of `https://{host}{path}`.
pub fn http_get(host: &str, path: &str) -> Result<String, Box<dyn Error>> {
    get(host, path, ACCEPT_HTML)
}

/// JSON document of `https://{host}{path}`.
pub fn http_get_json(host: &str, path: &str) -> Result<Value, Box<dyn Error>> {
    let body = get(host, path, ACCEPT_JSON)?;
    serde_json::from_str(&body).map_err(|e| format!("Bad JSON from {host}{path}: {e}").into())
}

fn get(host: &str, path: &str, accept: &str) -> Result<String, Box<dyn Error>> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?;

    let resp = client
        .get(url(host, path))
        .header(ACCEPT, accept)
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
        .header(REFERER, format!("https://{host}/"))
        .send()
        .map_err(|e| format!("HTTP request failed ({host}{path}): {e}"))?;

    let status = resp.status();
    if status != StatusCode::OK {
        return Err(status_error(status, host, path).into());
    }
    Ok(resp.text()?)
}

pub fn url(host: &str, path: &str) -> String {
    format!("https://{host}{path}")
}

/// `HTTP error: <code> <reason> (<host><path>)`
pub fn status_error(status: StatusCode, host: &str, path: &str) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP error: {} {reason} ({host}{path})", status.as_u16()),
        None => format!("HTTP error: {} ({host}{path})", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_https() {
        assert_eq!(url("www.espn.com", "/nfl/standings"), "https://www.espn.com/nfl/standings");
    }

    #[test]
    fn non_ok_status_names_the_status_line() {
        let msg = status_error(StatusCode::MOVED_PERMANENTLY, "www.nfl.com", "/standings");
        assert_eq!(msg, "HTTP error: 301 Moved Permanently (www.nfl.com/standings)");
    }

    #[test]
    fn unknown_status_has_no_reason() {
        let code = StatusCode::from_u16(599).unwrap();
        assert_eq!(status_error(code, "h", "/p"), "HTTP error: 599 (h/p)");
    }
}
