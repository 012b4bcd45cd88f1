// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

//! Client for the asynchronous charts query service.
//!
//! The remote protocol has three steps: submit a parameterized query, poll
//! the resulting job until it carries a result id, fetch the tabular result.
//! Submission always sends `max_age: 0` so a cached result is never reused,
//! and `apply_auto_limit: true`; both are fixed protocol constants.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::TriageError;
use crate::model::{ChartsJob, QueryParameters, RunRecord};

/// Transport for the submit / poll / fetch-result protocol.
#[async_trait]
pub trait ChartsApi {
    /// Submits the query and returns the job handle from the response.
    async fn submit(&self, parameters: &QueryParameters) -> Result<ChartsJob, TriageError>;
    /// Fetches the freshest status snapshot for a submitted job.
    async fn poll(&self, job_id: &str) -> Result<ChartsJob, TriageError>;
    /// Fetches the rows of a completed query result. Row shape is not
    /// validated beyond deserialization.
    async fn fetch_rows(&self, result_id: u64) -> Result<Vec<RunRecord>, TriageError>;
}

#[derive(Deserialize)]
struct JobEnvelope {
    job: ChartsJob,
}

#[derive(Deserialize)]
struct QueryResultEnvelope {
    query_result: QueryResult,
}

#[derive(Deserialize)]
struct QueryResult {
    data: QueryResultData,
}

#[derive(Deserialize)]
struct QueryResultData {
    rows: Vec<RunRecord>,
}

/// HTTP implementation of [`ChartsApi`].
pub struct HttpChartsClient {
    client: reqwest::Client,
    base_url: String,
    query_id: u64,
    token: String,
}

impl HttpChartsClient {
    pub fn new(base_url: String, query_id: u64, token: String) -> Self {
        HttpChartsClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            query_id,
            token,
        }
    }

    fn auth_header(&self) -> String {
        format!("Key {}", self.token)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TriageError> {
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| TriageError::MalformedResponse(format!("charts response: {e}")))
    }
}

#[async_trait]
impl ChartsApi for HttpChartsClient {
    async fn submit(&self, parameters: &QueryParameters) -> Result<ChartsJob, TriageError> {
        let url = format!("{}/api/queries/{}/results", self.base_url, self.query_id);
        let body = json!({
            "apply_auto_limit": true,
            "id": self.query_id,
            "max_age": 0,
            "parameters": parameters,
        });
        debug!("Submitting charts query {}", self.query_id);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await?;
        let envelope: JobEnvelope = Self::decode(response).await?;
        Ok(envelope.job)
    }

    async fn poll(&self, job_id: &str) -> Result<ChartsJob, TriageError> {
        let url = format!("{}/api/jobs/{}", self.base_url, job_id);
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;
        let envelope: JobEnvelope = Self::decode(response).await?;
        Ok(envelope.job)
    }

    async fn fetch_rows(&self, result_id: u64) -> Result<Vec<RunRecord>, TriageError> {
        let url = format!("{}/api/query_results/{}", self.base_url, result_id);
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;
        let envelope: QueryResultEnvelope = Self::decode(response).await?;
        Ok(envelope.query_result.data.rows)
    }
}
