// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use tracing::debug;

use crate::charts::ChartsApi;
use crate::error::TriageError;
use crate::model::ChartsJob;

/// Default delay between consecutive status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4000);

/// Drives a submitted charts job to completion by fixed-interval polling.
///
/// By default the loop is unbounded: no timeout, no maximum attempts, no
/// backoff. The remote service does not expose a failed state distinct from
/// a running one, so a job that errored server-side keeps the default loop
/// spinning until the process is killed. This mirrors the original tool;
/// `max_polls` is the opt-in safety bound.
pub struct JobPoller<C> {
    api: C,
    poll_interval: Duration,
    max_polls: Option<u32>,
}

impl<C: ChartsApi> JobPoller<C> {
    pub fn new(api: C) -> Self {
        JobPoller {
            api,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Bounds the loop at `max_polls` status fetches. `None` preserves the
    /// original unbounded behavior.
    pub fn with_max_polls(mut self, max_polls: Option<u32>) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    /// Polls until the job carries a result id.
    ///
    /// A snapshot that already carries one is returned immediately, without
    /// a poll or a delay. Otherwise the job is re-fetched, sleeping
    /// `poll_interval` between consecutive polls only, so `max_polls = n`
    /// sleeps at most `n - 1` times. Returns `Ok(None)` only when a
    /// configured `max_polls` bound is exhausted.
    pub async fn await_completion(&self, job: ChartsJob) -> Result<Option<u64>, TriageError> {
        if let Some(result_id) = job.query_result_id {
            return Ok(Some(result_id));
        }
        let mut polls = 0u32;
        while self.max_polls.map_or(true, |max| polls < max) {
            if polls > 0 {
                tokio::time::sleep(self.poll_interval).await;
            }
            let snapshot = self.api.poll(&job.id).await?;
            polls += 1;
            if let Some(result_id) = snapshot.query_result_id {
                debug!("Job {} completed with result {result_id}", job.id);
                return Ok(Some(result_id));
            }
            debug!("Job {} still running after {polls} polls", job.id);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QueryParameters, RunRecord};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Completes after a fixed number of polls, counting calls.
    struct ScriptedApi {
        polls_until_ready: u32,
        poll_calls: AtomicU32,
    }

    impl ScriptedApi {
        fn new(polls_until_ready: u32) -> Self {
            ScriptedApi {
                polls_until_ready,
                poll_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ChartsApi for ScriptedApi {
        async fn submit(&self, _parameters: &QueryParameters) -> Result<ChartsJob, TriageError> {
            Ok(ChartsJob {
                id: "j-1".to_string(),
                query_result_id: None,
            })
        }

        async fn poll(&self, job_id: &str) -> Result<ChartsJob, TriageError> {
            let calls = self.poll_calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(ChartsJob {
                id: job_id.to_string(),
                query_result_id: (calls >= self.polls_until_ready).then_some(77),
            })
        }

        async fn fetch_rows(&self, _result_id: u64) -> Result<Vec<RunRecord>, TriageError> {
            Ok(vec![])
        }
    }

    fn fast_poller(api: ScriptedApi) -> JobPoller<ScriptedApi> {
        JobPoller::new(api).with_poll_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_completed_snapshot_returns_without_polling() {
        let poller = fast_poller(ScriptedApi::new(1));
        let job = ChartsJob {
            id: "j-1".to_string(),
            query_result_id: Some(5),
        };
        let started = std::time::Instant::now();
        let result = poller.await_completion(job).await.unwrap();
        assert_eq!(result, Some(5));
        assert_eq!(poller.api().poll_calls.load(Ordering::SeqCst), 0);
        assert!(started.elapsed() < DEFAULT_POLL_INTERVAL);
    }

    #[tokio::test]
    async fn test_two_polls_until_result() {
        let poller = fast_poller(ScriptedApi::new(2));
        let job = ChartsJob {
            id: "j-1".to_string(),
            query_result_id: None,
        };
        let result = poller.await_completion(job).await.unwrap();
        assert_eq!(result, Some(77));
        assert_eq!(poller.api().poll_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_polls_sleep_exactly_one_interval() {
        let poller = JobPoller::new(ScriptedApi::new(2));
        let job = ChartsJob {
            id: "j-1".to_string(),
            query_result_id: None,
        };
        let started = tokio::time::Instant::now();
        let result = poller.await_completion(job).await.unwrap();
        assert_eq!(result, Some(77));
        assert_eq!(poller.api().poll_calls.load(Ordering::SeqCst), 2);
        // One fixed delay between the two polls, nothing before or after.
        assert_eq!(started.elapsed(), DEFAULT_POLL_INTERVAL);
    }

    #[tokio::test]
    async fn test_bounded_poller_gives_up() {
        let poller = fast_poller(ScriptedApi::new(10)).with_max_polls(Some(3));
        let job = ChartsJob {
            id: "j-1".to_string(),
            query_result_id: None,
        };
        let result = poller.await_completion(job).await.unwrap();
        assert_eq!(result, None);
        assert_eq!(poller.api().poll_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_poller_does_not_sleep_after_last_poll() {
        let poller = JobPoller::new(ScriptedApi::new(10)).with_max_polls(Some(3));
        let job = ChartsJob {
            id: "j-1".to_string(),
            query_result_id: None,
        };
        let started = tokio::time::Instant::now();
        let result = poller.await_completion(job).await.unwrap();
        assert_eq!(result, None);
        assert_eq!(poller.api().poll_calls.load(Ordering::SeqCst), 3);
        // Delays only between consecutive polls: three polls, two sleeps.
        assert_eq!(started.elapsed(), 2 * DEFAULT_POLL_INTERVAL);
    }
}
