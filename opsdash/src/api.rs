//! Minimal HTTP client for the dashboard backend.

use reqwest::{Certificate, Client, StatusCode};
use url::Url;

use crate::error::FetchError;
use crate::types::{ErrorStats, LoadTestResult, Snapshot, WorkResult};

pub const DASHBOARD_DATA: &str = "/api/dashboard-data";
pub const HEALTH: &str = "/api/health";
pub const METRICS: &str = "/api/metrics";
pub const USERS: &str = "/api/users";
pub const SIMULATE_WORK: &str = "/api/simulate-work";
pub const LOAD_TEST: &str = "/api/load-test";
pub const ERROR_STATS: &str = "/api/error-stats";
pub const RESET_ERRORS: &str = "/api/reset-errors";

/// Result of a request whose body nobody reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Ok(StatusCode),
    Failed(String),
}

impl RequestOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, RequestOutcome::Ok(_))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Build a client for `base` (e.g. `http://127.0.0.1:8000`). `tls_ca` is an extra
    /// PEM root certificate for backends behind a private CA.
    pub fn new(base: &str, tls_ca: Option<&str>) -> Result<Self, FetchError> {
        let base = Url::parse(base)?;
        let mut builder = Client::builder();
        if let Some(path) = tls_ca {
            let pem = std::fs::read(path).map_err(|e| FetchError::Tls(format!("{path}: {e}")))?;
            let cert = Certificate::from_pem(&pem).map_err(|e| FetchError::Tls(e.to_string()))?;
            builder = builder.add_root_certificate(cert);
        }
        let http = builder.build().map_err(|e| FetchError::Tls(e.to_string()))?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        Ok(self.base.join(path)?)
    }

    // Single GET of the telemetry snapshot; no retry, no timeout
    pub async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let url = self.endpoint(DASHBOARD_DATA)?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Http(resp.status()));
        }
        Ok(resp.json::<Snapshot>().await?)
    }

    pub async fn simulate_work(&self) -> Result<WorkResult, FetchError> {
        let url = self.endpoint(SIMULATE_WORK)?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Http(resp.status()));
        }
        Ok(resp.json::<WorkResult>().await?)
    }

    /// Ask the backend to put load on itself. Resolves when its load run finishes.
    pub async fn load_test(&self) -> Result<LoadTestResult, FetchError> {
        let url = self.endpoint(LOAD_TEST)?;
        let resp = self.http.post(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Http(resp.status()));
        }
        Ok(resp.json::<LoadTestResult>().await?)
    }

    pub async fn error_stats(&self) -> Result<ErrorStats, FetchError> {
        let url = self.endpoint(ERROR_STATS)?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Http(resp.status()));
        }
        Ok(resp.json::<ErrorStats>().await?)
    }

    /// Zero the health-check failure counter and switch every error simulation off.
    pub async fn reset_errors(&self) -> Result<(), FetchError> {
        let url = self.endpoint(RESET_ERRORS)?;
        let resp = self.http.post(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Http(resp.status()));
        }
        Ok(())
    }

    /// Fire a GET and report what happened instead of failing.
    pub async fn get_best_effort(&self, path: &str) -> RequestOutcome {
        let url = match self.endpoint(path) {
            Ok(u) => u,
            Err(e) => return RequestOutcome::Failed(e.to_string()),
        };
        match self.http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => RequestOutcome::Ok(resp.status()),
            Ok(resp) => RequestOutcome::Failed(format!("status {}", resp.status())),
            Err(e) => RequestOutcome::Failed(FetchError::from(e).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_base() {
        let c = ApiClient::new("http://127.0.0.1:8000", None).unwrap();
        assert_eq!(
            c.endpoint(DASHBOARD_DATA).unwrap().as_str(),
            "http://127.0.0.1:8000/api/dashboard-data"
        );
        let c = ApiClient::new("https://ops.example.com/", None).unwrap();
        assert_eq!(
            c.endpoint(HEALTH).unwrap().as_str(),
            "https://ops.example.com/api/health"
        );
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("not a url", None),
            Err(FetchError::Url(_))
        ));
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let err = ApiClient::new("https://h", Some("/definitely/not/here.pem")).unwrap_err();
        assert!(matches!(err, FetchError::Tls(_)));
    }
}
