//! HTTP client for the worker's SQL endpoints.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::observability::metrics;

/// Errors from talking to the worker.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The worker URL or an endpoint path did not parse.
    #[error("invalid worker URL: {0}")]
    Url(#[from] url::ParseError),

    /// Connection, body or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The worker answered with a non-success status.
    #[error("worker returned {status}: {message}")]
    Worker { status: StatusCode, message: String },
}

#[derive(Debug, Serialize)]
struct WorkerRequest<'a> {
    sql: &'a str,
}

/// Body returned by `/exec` and `/query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkerResponse {
    pub rows_affected: i64,
    pub last_insert_id: i64,
    pub error: String,
}

/// Issues SQL statements to a worker over HTTP.
#[derive(Debug, Clone)]
pub struct WorkerClient {
    http: reqwest::Client,
    exec_url: Url,
    query_url: Url,
}

impl WorkerClient {
    /// Create a client for the worker at `base`, e.g. `http://localhost:3000`.
    pub fn new(base: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base)?;
        Ok(Self {
            http: reqwest::Client::new(),
            exec_url: base.join("exec")?,
            query_url: base.join("query")?,
        })
    }

    /// Run a statement that modifies data.
    pub async fn exec(&self, sql: &str) -> Result<WorkerResponse, ClientError> {
        self.send("exec", &self.exec_url, sql).await
    }

    /// Run a statement that reads data; `rows_affected` is the row count.
    pub async fn query(&self, sql: &str) -> Result<WorkerResponse, ClientError> {
        self.send("query", &self.query_url, sql).await
    }

    async fn send(&self, kind: &'static str, url: &Url, sql: &str) -> Result<WorkerResponse, ClientError> {
        let res = self
            .http
            .post(url.clone())
            .json(&WorkerRequest { sql })
            .send()
            .await
            .inspect_err(|_| metrics::record_request(kind, "error"))?;

        let status = res.status();
        if !status.is_success() {
            metrics::record_request(kind, "failed");
            let message = res.text().await.unwrap_or_default();
            return Err(ClientError::Worker { status, message });
        }

        metrics::record_request(kind, "ok");
        Ok(res.json().await?)
    }
}
