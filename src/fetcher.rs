use log::{debug, info};
use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, REFERER},
};

use crate::config::Config;
use crate::error::{CheckError, Result};

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "de-DE,de;q=0.9,en;q=0.8";

/// Fetch the station page and return its body. One request, no retries:
/// a network error or a non-2xx status ends the check.
pub async fn fetch_station_page(config: &Config) -> Result<String> {
    let failure = |reason: String| CheckError::FetchFailure {
        station: config.station,
        reason,
    };

    let client = build_client(config).map_err(|e| failure(e.to_string()))?;
    let url = config.station_url();
    debug!("GET {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| failure(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(failure(format!("HTTP {}", status)));
    }

    let body = response.text().await.map_err(|e| failure(e.to_string()))?;
    info!("Fetched {} ({} bytes)", url, body.len());
    Ok(body)
}

/// Desktop-browser look-alike without connection reuse.
fn build_client(config: &Config) -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
    if let Ok(referer) = HeaderValue::from_str(config.base_url.as_str()) {
        headers.insert(REFERER, referer);
    }

    Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .pool_max_idle_per_host(0)
        .build()
}
