// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

//! Client for the run platform API: dataset listings, run logs, and stored
//! run inputs. All calls return complete bodies, never streams.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::TriageError;
use crate::model::RunRecord;

/// Key under which a run's input payload is stored in its key-value store.
pub const INPUT_RECORD_KEY: &str = "INPUT";

/// Access to run metadata and log text on the platform.
#[async_trait]
pub trait PlatformClient {
    /// Lists the rows of a pre-materialized run dataset.
    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<RunRecord>, TriageError>;
    /// Fetches a run's complete log as one text blob. A run without a
    /// stored log yields the empty string.
    async fn run_log(&self, run_id: &str) -> Result<String, TriageError>;
    /// Fetches the run's stored `INPUT` record; absence is `None`, not an
    /// error.
    async fn run_input(&self, run_id: &str) -> Result<Option<serde_json::Value>, TriageError>;
}

/// HTTP implementation of [`PlatformClient`].
pub struct HttpPlatformClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpPlatformClient {
    pub fn new(base_url: String, token: String) -> Self {
        HttpPlatformClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        self.client.get(url).bearer_auth(&self.token)
    }
}

#[async_trait]
impl PlatformClient for HttpPlatformClient {
    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<RunRecord>, TriageError> {
        // Existence check first so a bad id fails as a missing resource
        // rather than a decode error on the items call.
        let meta_url = format!("{}/v2/datasets/{dataset_id}", self.base_url);
        let response = self.get(meta_url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TriageError::ResourceNotFound(format!(
                "dataset {dataset_id}"
            )));
        }
        response.error_for_status()?;

        let items_url = format!("{}/v2/datasets/{dataset_id}/items", self.base_url);
        let response = self.get(items_url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let items: Vec<RunRecord> = serde_json::from_str(&body)
            .map_err(|e| TriageError::MalformedResponse(format!("dataset items: {e}")))?;
        debug!("Dataset {dataset_id} listed {} runs", items.len());
        Ok(items)
    }

    async fn run_log(&self, run_id: &str) -> Result<String, TriageError> {
        let url = format!("{}/v2/actor-runs/{run_id}/log", self.base_url);
        let response = self.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            // A run without a stored log is classified as if it were empty.
            return Ok(String::new());
        }
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    async fn run_input(&self, run_id: &str) -> Result<Option<serde_json::Value>, TriageError> {
        let url = format!(
            "{}/v2/actor-runs/{run_id}/key-value-store/records/{INPUT_RECORD_KEY}",
            self.base_url
        );
        let response = self.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let value = serde_json::from_str(&body)
            .map_err(|e| TriageError::MalformedResponse(format!("input record: {e}")))?;
        Ok(Some(value))
    }
}
