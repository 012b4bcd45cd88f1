// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

//! Where the list of runs to analyze comes from.
//!
//! Two acquisition modes sit behind one trait so the collection, the
//! classification, and the sort downstream are written once: a flat dataset
//! listing, or the rows of an asynchronous charts query driven through the
//! poller. Both produce the same [`RunRecord`] shape.

use async_trait::async_trait;
use tracing::info;

use crate::charts::ChartsApi;
use crate::error::TriageError;
use crate::model::{QueryParameters, RunRecord};
use crate::platform::PlatformClient;
use crate::poller::JobPoller;

/// Produces the run records to triage, in a meaningful order.
#[async_trait]
pub trait RunSource {
    async fn fetch_runs(&self) -> Result<Vec<RunRecord>, TriageError>;
}

/// Direct mode: list an existing run dataset.
pub struct DatasetSource<P> {
    platform: P,
    dataset_id: String,
}

impl<P: PlatformClient> DatasetSource<P> {
    pub fn new(platform: P, dataset_id: String) -> Self {
        DatasetSource {
            platform,
            dataset_id,
        }
    }
}

#[async_trait]
impl<P: PlatformClient + Sync + Send> RunSource for DatasetSource<P> {
    async fn fetch_runs(&self) -> Result<Vec<RunRecord>, TriageError> {
        self.platform.dataset_items(&self.dataset_id).await
    }
}

/// Query mode: submit the charts query, poll it to completion, fetch rows.
pub struct ChartsQuerySource<C> {
    poller: JobPoller<C>,
    parameters: QueryParameters,
}

impl<C: ChartsApi> ChartsQuerySource<C> {
    pub fn new(poller: JobPoller<C>, parameters: QueryParameters) -> Self {
        ChartsQuerySource { poller, parameters }
    }
}

#[async_trait]
impl<C: ChartsApi + Sync + Send> RunSource for ChartsQuerySource<C> {
    async fn fetch_runs(&self) -> Result<Vec<RunRecord>, TriageError> {
        let job = self.poller.api().submit(&self.parameters).await?;
        info!("Submitted charts query job {}", job.id);
        let result_id = self
            .poller
            .await_completion(job)
            .await?
            .ok_or(TriageError::ResultUnavailable)?;
        self.poller.api().fetch_rows(result_id).await
    }
}
