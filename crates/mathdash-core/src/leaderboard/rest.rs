//! PostgREST table over HTTP
//!
//! `GET  {url}/rest/v1/{table}?select=*&order=score.desc&limit=N`
//! `POST {url}/rest/v1/{table}` with a one-row JSON array

use super::{LeaderboardEntry, LeaderboardError, LeaderboardResult, RemoteBackend, RemoteConfig};
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;

/// Remote leaderboard stored in a PostgREST table
pub struct RestRemote {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RestRemote {
    pub fn new(config: RemoteConfig) -> LeaderboardResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeaderboardError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/{}", config.base_url, config.table),
            api_key: config.api_key,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn check_status(response: Response) -> LeaderboardResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(LeaderboardError::Server(format!("{}: {}", status, body.trim())))
    }
}

impl RemoteBackend for RestRemote {
    fn fetch_top(&self, limit: usize) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        let limit = limit.to_string();
        let request = self.client.get(&self.endpoint).query(&[
            ("select", "*"),
            ("order", "score.desc"),
            ("limit", limit.as_str()),
        ]);

        let response = self
            .authorized(request)
            .send()
            .map_err(|e| LeaderboardError::Network(e.to_string()))?;

        Self::check_status(response)?
            .json::<Vec<LeaderboardEntry>>()
            .map_err(|e| LeaderboardError::InvalidResponse(e.to_string()))
    }

    fn insert(&self, entry: &LeaderboardEntry) -> LeaderboardResult<()> {
        let request = self
            .client
            .post(&self.endpoint)
            .header("Prefer", "return=minimal")
            .json(&[entry]);

        let response = self
            .authorized(request)
            .send()
            .map_err(|e| LeaderboardError::Network(e.to_string()))?;

        Self::check_status(response)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Remote"
    }
}
