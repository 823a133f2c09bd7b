//! NOAA HOMR station search.
//!
//! One GET per platform against `{base_url}/search`; the station arrays are
//! concatenated in platform order. Any transport error or non-success status
//! aborts the run before anything is merged. No retries.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use radarsite_io::homr;

use crate::exit_codes;
use crate::CliError;

// ── Constants ───────────────────────────────────────────────────────

const USER_AGENT: &str = concat!("radar-sites/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body echoed back in a hint.
const MAX_ERROR_BODY: usize = 300;

// ── HomrClient ──────────────────────────────────────────────────────

pub struct HomrClient {
    http: Client,
    base_url: String,
}

impl HomrClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CliError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| upstream_err(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Raw station objects for one platform.
    pub fn search(&self, platform: &str, current_only: bool) -> Result<Vec<Value>, CliError> {
        let url = format!("{}/search", self.base_url);

        let mut query = vec![
            ("definitions", "false"),
            ("phrData", "false"),
            ("platform", platform),
        ];
        if current_only {
            query.push(("current", "true"));
        }

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .map_err(|e| upstream_err(format!("HOMR request for {platform} failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| upstream_err(format!("HOMR response for {platform} unreadable: {e}")))?;

        if !status.is_success() {
            let mut err = upstream_err(format!("HOMR returned {status} for platform {platform}"));
            let body = text.trim();
            if !body.is_empty() {
                err = err.with_hint(body.chars().take(MAX_ERROR_BODY).collect::<String>());
            }
            return Err(err);
        }

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| upstream_err(format!("HOMR response for {platform} is not JSON: {e}")))?;

        homr::stations_from_response(body).map_err(|e| upstream_err(e.to_string()))
    }

    /// Stations for every platform, concatenated in the given order.
    pub fn fetch_all(&self, platforms: &[&str], current_only: bool) -> Result<Vec<Value>, CliError> {
        let mut stations = Vec::new();
        for platform in platforms {
            log::info!("Getting {platform} stations");
            let batch = self.search(platform, current_only)?;
            log::debug!("{} {platform} stations", batch.len());
            stations.extend(batch);
        }
        Ok(stations)
    }
}

fn upstream_err(message: String) -> CliError {
    CliError {
        code: exit_codes::EXIT_UPSTREAM,
        message,
        hint: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn station(id: &str) -> Value {
        json!({
            "header": {"latitude_dec": "35.0", "longitude_dec": "-97.0"},
            "identifiers": [{"idType": "NEXRAD", "id": id}],
            "platforms": [{"platform": "NEXRAD"}]
        })
    }

    fn search_response(stations: Vec<Value>) -> Value {
        json!({"stationCollection": {"stations": stations}})
    }

    fn client(server: &MockServer) -> HomrClient {
        HomrClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn search_sends_expected_query() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("definitions", "false")
                .query_param("phrData", "false")
                .query_param("platform", "NEXRAD")
                .query_param("current", "true");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(search_response(vec![station("KTLX")]));
        });

        let stations = client(&server).search("NEXRAD", true).unwrap();
        mock.assert();
        assert_eq!(stations.len(), 1);
    }

    #[test]
    fn current_param_omitted_by_default() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/search").query_param_missing("current");
            then.status(200).json_body(search_response(vec![]));
        });

        assert!(client(&server).search("TDWR", false).unwrap().is_empty());
        mock.assert();
    }

    #[test]
    fn fetch_all_concatenates_in_order() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search").query_param("platform", "NEXRAD");
            then.status(200).json_body(search_response(vec![station("KTLX"), station("KINX")]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/search").query_param("platform", "TDWR");
            then.status(200).json_body(search_response(vec![station("TOKC")]));
        });

        let stations = client(&server).fetch_all(&["NEXRAD", "TDWR"], false).unwrap();
        let ids: Vec<&str> = stations
            .iter()
            .map(|s| s["identifiers"][0]["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["KTLX", "KINX", "TOKC"]);
    }

    #[test]
    fn server_error_is_upstream_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(503).body("maintenance window");
        });

        let err = client(&server).search("NEXRAD", false).unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_UPSTREAM);
        assert!(err.message.contains("503"));
        assert_eq!(err.hint.as_deref(), Some("maintenance window"));
    }

    #[test]
    fn non_json_body_is_upstream_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).body("<html>");
        });

        let err = client(&server).search("NEXRAD", false).unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_UPSTREAM);
    }

    #[test]
    fn connection_refused_is_upstream_failure() {
        let client = HomrClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.search("NEXRAD", false).unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_UPSTREAM);
    }
}
