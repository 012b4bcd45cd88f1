// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::time::Duration;

use crate::error::TriageError;
use crate::model::QueryParameters;
use crate::poller::DEFAULT_POLL_INTERVAL;

const DEFAULT_PLATFORM_URL: &str = "https://api.apify.com";
const DEFAULT_CHARTS_URL: &str = "https://charts.apify.com";
const DEFAULT_QUERY_ID: u64 = 979;

/// Where the run records come from.
#[derive(Debug, Clone)]
pub enum RunSourceConfig {
    /// Direct mode: list an existing dataset of run rows.
    Dataset { dataset_id: String },
    /// Query mode: run the charts query and poll it to completion.
    Query {
        charts_url: String,
        charts_token: String,
        query_id: u64,
        parameters: QueryParameters,
    },
}

/// Configuration for one triage batch, read from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Execution credential for the platform client.
    pub platform_token: String,
    /// Platform API base URL.
    pub platform_url: String,
    /// Dataset the sorted summary records are appended to.
    pub output_dataset_id: String,
    pub source: RunSourceConfig,
    /// Delay between consecutive status polls in query mode.
    pub poll_interval: Duration,
    /// Optional bound on status polls; `None` polls indefinitely, matching
    /// the original tool.
    pub max_polls: Option<u32>,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

fn required(name: &str) -> Result<String, TriageError> {
    env::var(name).map_err(|_| TriageError::InputMissing(name.to_string()))
}

impl Config {
    /// Create configuration from environment variables.
    ///
    /// Direct mode is selected when `TRIAGE_DATASET_ID` is set, otherwise
    /// query mode; query mode requires the actor id, limit, date partition,
    /// and charts token.
    pub fn from_env() -> Result<Self, TriageError> {
        let platform_token = required("TRIAGE_PLATFORM_TOKEN")?;
        let platform_url =
            env::var("TRIAGE_PLATFORM_URL").unwrap_or_else(|_| DEFAULT_PLATFORM_URL.to_string());
        let output_dataset_id = required("TRIAGE_OUTPUT_DATASET_ID")?;

        let source = match env::var("TRIAGE_DATASET_ID") {
            Ok(dataset_id) => RunSourceConfig::Dataset { dataset_id },
            Err(_) => RunSourceConfig::Query {
                charts_url: env::var("TRIAGE_CHARTS_URL")
                    .unwrap_or_else(|_| DEFAULT_CHARTS_URL.to_string()),
                charts_token: required("TRIAGE_CHARTS_TOKEN")?,
                query_id: env::var("TRIAGE_QUERY_ID")
                    .ok()
                    .and_then(|id| id.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_QUERY_ID),
                parameters: QueryParameters {
                    actor_id: required("TRIAGE_ACTOR_ID")?,
                    limit: required("TRIAGE_LIMIT")?,
                    part_of_date: required("TRIAGE_PART_OF_DATE")?,
                },
            },
        };

        let poll_interval = env::var("TRIAGE_POLL_INTERVAL_MS")
            .ok()
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        let max_polls = env::var("TRIAGE_MAX_POLLS")
            .ok()
            .and_then(|n| n.parse::<u32>().ok());
        let log_level = env::var("TRIAGE_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| "info".to_string());

        let config = Self {
            platform_token,
            platform_url,
            output_dataset_id,
            source,
            poll_interval,
            max_polls,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), TriageError> {
        if self.platform_token.trim().is_empty() {
            return Err(TriageError::InputMissing(
                "TRIAGE_PLATFORM_TOKEN".to_string(),
            ));
        }
        if self.output_dataset_id.trim().is_empty() {
            return Err(TriageError::InputMissing(
                "TRIAGE_OUTPUT_DATASET_ID".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(TriageError::InputMissing(format!(
                "invalid log level '{}', must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}
