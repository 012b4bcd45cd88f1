// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

use tracing::info;

use crate::classifier::classify;
use crate::error::TriageError;
use crate::model::{RunRecord, RunSummary};
use crate::platform::PlatformClient;

/// Builds one [`RunSummary`] per run record.
///
/// Runs are processed strictly sequentially in source order. A failure
/// fetching one run's log or input aborts the whole batch; there is no
/// per-run isolation and no partial result.
pub struct RunStatsCollector<P> {
    platform: P,
}

impl<P: PlatformClient> RunStatsCollector<P> {
    pub fn new(platform: P) -> Self {
        RunStatsCollector { platform }
    }

    /// Fetches log text and stored input for every record, classifies the
    /// log, and returns the summaries in input order.
    pub async fn collect(&self, records: Vec<RunRecord>) -> Result<Vec<RunSummary>, TriageError> {
        let total = records.len();
        let mut summaries = Vec::with_capacity(total);
        for (index, record) in records.into_iter().enumerate() {
            info!("({index}/{total}) Processing run {}", record.run_id);
            let log_text = self.platform.run_log(&record.run_id).await?;
            let input = self.platform.run_input(&record.run_id).await?;
            let stats = classify(&log_text);
            summaries.push(RunSummary::from_parts(record, stats, input));
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakePlatform {
        logs: HashMap<String, String>,
        inputs: HashMap<String, serde_json::Value>,
        failing_run: Option<String>,
    }

    #[async_trait]
    impl PlatformClient for FakePlatform {
        async fn dataset_items(&self, _dataset_id: &str) -> Result<Vec<RunRecord>, TriageError> {
            Ok(vec![])
        }

        async fn run_log(&self, run_id: &str) -> Result<String, TriageError> {
            if self.failing_run.as_deref() == Some(run_id) {
                return Err(TriageError::ResourceNotFound(format!("run {run_id}")));
            }
            Ok(self.logs.get(run_id).cloned().unwrap_or_default())
        }

        async fn run_input(&self, run_id: &str) -> Result<Option<serde_json::Value>, TriageError> {
            Ok(self.inputs.get(run_id).cloned())
        }
    }

    fn record(run_id: &str) -> RunRecord {
        RunRecord {
            user_id: "u".to_string(),
            run_id: run_id.to_string(),
            started_at: "s".to_string(),
            finished_at: "f".to_string(),
            dataset_clean_item_count: 0,
            status: "SUCCEEDED".to_string(),
            duration_seconds: 1.0,
            build_id: "b".to_string(),
            options_build: "v".to_string(),
            run_link: "rl".to_string(),
            user_link: "ul".to_string(),
        }
    }

    #[tokio::test]
    async fn test_collect_classifies_each_run_in_order() {
        let mut logs = HashMap::new();
        logs.insert(
            "run-a".to_string(),
            concat!(
                "2024-01-01T00:00:00.000Z WARN w1\n",
                "2024-01-01T00:00:01.000Z ERROR e1\n",
            )
            .to_string(),
        );
        logs.insert(
            "run-b".to_string(),
            "2024-01-01T00:00:00.000Z INFO fine".to_string(),
        );
        let mut inputs = HashMap::new();
        inputs.insert("run-a".to_string(), serde_json::json!({"url": "x"}));
        let platform = FakePlatform {
            logs,
            inputs,
            failing_run: None,
        };

        let collector = RunStatsCollector::new(platform);
        let summaries = collector
            .collect(vec![record("run-a"), record("run-b")])
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].run_id, "run-a");
        assert_eq!(summaries[0].warns, 1);
        assert_eq!(summaries[0].errors, 1);
        assert_eq!(summaries[0].input, Some(serde_json::json!({"url": "x"})));
        assert_eq!(summaries[1].run_id, "run-b");
        assert_eq!(summaries[1].infos, 1);
        assert_eq!(summaries[1].input, None);
    }

    #[tokio::test]
    async fn test_collect_aborts_batch_on_first_failure() {
        let platform = FakePlatform {
            logs: HashMap::new(),
            inputs: HashMap::new(),
            failing_run: Some("run-b".to_string()),
        };
        let collector = RunStatsCollector::new(platform);
        let err = collector
            .collect(vec![record("run-a"), record("run-b"), record("run-c")])
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::ResourceNotFound(_)));
    }
}
