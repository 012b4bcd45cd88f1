// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use tracing::debug;

use crate::error::TriageError;
use crate::model::RunSummary;

/// Persistent output store for summary records.
#[async_trait]
pub trait SummarySink {
    /// Writes one record. Records already written stay persisted even if a
    /// later write fails; there is no rollback.
    async fn push(&self, summary: &RunSummary) -> Result<(), TriageError>;
}

/// Sorts summaries by descending `warns + errors`.
///
/// `sort_by` is stable, so summaries with equal totals keep their collection
/// order, which follows the source order and is meaningful.
pub fn sort_by_severity(summaries: &mut [RunSummary]) {
    summaries.sort_by(|a, b| b.severity_total().cmp(&a.severity_total()));
}

/// Sorts the collected summaries and writes them one at a time, worst runs
/// first. No batching, no dedup.
pub async fn emit_sorted<S: SummarySink>(
    sink: &S,
    mut summaries: Vec<RunSummary>,
) -> Result<(), TriageError> {
    sort_by_severity(&mut summaries);
    for summary in &summaries {
        sink.push(summary).await?;
    }
    debug!("Emitted {} summary records", summaries.len());
    Ok(())
}

/// Appends records to an output dataset over HTTP, one per call.
pub struct HttpDatasetSink {
    client: reqwest::Client,
    base_url: String,
    dataset_id: String,
    token: String,
}

impl HttpDatasetSink {
    pub fn new(base_url: String, dataset_id: String, token: String) -> Self {
        HttpDatasetSink {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset_id,
            token,
        }
    }
}

#[async_trait]
impl SummarySink for HttpDatasetSink {
    async fn push(&self, summary: &RunSummary) -> Result<(), TriageError> {
        let url = format!("{}/v2/datasets/{}/items", self.base_url, self.dataset_id);
        self.client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&[summary])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
