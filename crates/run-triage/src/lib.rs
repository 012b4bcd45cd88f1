// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

//! Batch triage of completed run logs.
//!
//! Fetches run metadata from one of two sources (a flat dataset listing or
//! an asynchronous charts query that must be polled to completion),
//! retrieves each run's log text, classifies every line by severity, and
//! emits one summary record per run, ranked by warnings plus errors.

pub mod charts;
pub mod classifier;
pub mod collector;
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod poller;
pub mod sink;
pub mod source;

pub use charts::{ChartsApi, HttpChartsClient};
pub use classifier::{classify, LogStats};
pub use collector::RunStatsCollector;
pub use config::{Config, RunSourceConfig};
pub use error::TriageError;
pub use model::{ChartsJob, QueryParameters, RunRecord, RunSummary};
pub use platform::{HttpPlatformClient, PlatformClient};
pub use poller::JobPoller;
pub use sink::{emit_sorted, sort_by_severity, HttpDatasetSink, SummarySink};
pub use source::{ChartsQuerySource, DatasetSource, RunSource};
