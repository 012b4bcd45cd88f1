// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::classifier::LogStats;

/// One completed run as reported by either acquisition mode.
///
/// The dataset listing and the charts query rows carry the same field set,
/// so a single wire shape covers both. Constructed once per run, read-only
/// afterwards, folded into a [`RunSummary`] by the collector.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RunRecord {
    pub user_id: String,
    pub run_id: String,
    pub started_at: String,
    pub finished_at: String,
    pub dataset_clean_item_count: u64,
    pub status: String,
    pub duration_seconds: f64,
    pub build_id: String,
    pub options_build: String,
    pub run_link: String,
    pub user_link: String,
}

/// The output unit: one run's metadata plus its classified log statistics.
///
/// Serialized camelCase, one flat record per run. `warn_messages` and
/// `error_messages` keep log order; their lengths always equal `warns` and
/// `errors` respectively.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: String,
    pub user_id: String,
    pub run_link: String,
    pub user_link: String,
    pub duration_secs: f64,
    pub dataset_items: u64,
    pub started_at: String,
    pub finished_at: String,
    pub status: String,
    pub infos: u64,
    pub warns: u64,
    pub errors: u64,
    pub warn_messages: Vec<String>,
    pub error_messages: Vec<String>,
    pub build_id: String,
    pub build_version: String,
    /// Opaque input payload stored alongside the run, absent when the run
    /// has no `INPUT` record.
    pub input: Option<serde_json::Value>,
}

impl RunSummary {
    /// Folds a run record, its classified log stats, and its stored input
    /// into one summary.
    pub fn from_parts(record: RunRecord, stats: LogStats, input: Option<serde_json::Value>) -> Self {
        RunSummary {
            run_id: record.run_id,
            user_id: record.user_id,
            run_link: record.run_link,
            user_link: record.user_link,
            duration_secs: record.duration_seconds,
            dataset_items: record.dataset_clean_item_count,
            started_at: record.started_at,
            finished_at: record.finished_at,
            status: record.status,
            infos: stats.infos,
            warns: stats.warns,
            errors: stats.errors,
            warn_messages: stats.warn_messages,
            error_messages: stats.error_messages,
            build_id: record.build_id,
            build_version: record.options_build,
            input,
        }
    }

    /// Ranking key for the output sort: total warnings plus errors.
    pub fn severity_total(&self) -> u64 {
        self.warns + self.errors
    }
}

/// Handle for one submitted analytical query.
///
/// `query_result_id` is present only once the remote job has completed.
/// Snapshots are never mutated locally; each poll yields a fresh one.
#[derive(Clone, Debug, Deserialize)]
pub struct ChartsJob {
    pub id: String,
    #[serde(default)]
    pub query_result_id: Option<u64>,
}

/// Parameters of the asynchronous charts query. Immutable caller input.
#[derive(Clone, Debug, Serialize)]
pub struct QueryParameters {
    pub actor_id: String,
    pub limit: String,
    pub part_of_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LogStats;

    fn record() -> RunRecord {
        RunRecord {
            user_id: "user-1".to_string(),
            run_id: "run-1".to_string(),
            started_at: "2024-01-01T00:00:00.000Z".to_string(),
            finished_at: "2024-01-01T00:10:00.000Z".to_string(),
            dataset_clean_item_count: 42,
            status: "SUCCEEDED".to_string(),
            duration_seconds: 600.0,
            build_id: "build-1".to_string(),
            options_build: "1.2.3".to_string(),
            run_link: "https://console.example.com/runs/run-1".to_string(),
            user_link: "https://console.example.com/users/user-1".to_string(),
        }
    }

    #[test]
    fn test_summary_from_parts() {
        let stats = LogStats {
            infos: 3,
            warns: 1,
            errors: 0,
            warn_messages: vec!["2024-01-01T00:00:01.000Z WARN low disk".to_string()],
            error_messages: vec![],
        };
        let summary = RunSummary::from_parts(record(), stats, None);
        assert_eq!(summary.run_id, "run-1");
        assert_eq!(summary.build_version, "1.2.3");
        assert_eq!(summary.severity_total(), 1);
        assert_eq!(summary.warn_messages.len() as u64, summary.warns);
        assert_eq!(summary.error_messages.len() as u64, summary.errors);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let stats = LogStats::default();
        let summary = RunSummary::from_parts(record(), stats, Some(serde_json::json!({"a": 1})));
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["runId"], "run-1");
        assert_eq!(value["datasetItems"], 42);
        assert_eq!(value["warnMessages"], serde_json::json!([]));
        assert_eq!(value["input"]["a"], 1);
    }

    #[test]
    fn test_record_wire_field_names() {
        let json = serde_json::json!({
            "user_id": "u",
            "run_id": "r",
            "started_at": "s",
            "finished_at": "f",
            "dataset_clean_item_count": 7,
            "status": "FAILED",
            "duration_seconds": 1.5,
            "build_id": "b",
            "options_build": "0.0.1",
            "run_link": "rl",
            "user_link": "ul"
        });
        let record: RunRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.dataset_clean_item_count, 7);
        assert_eq!(record.options_build, "0.0.1");
    }
}
