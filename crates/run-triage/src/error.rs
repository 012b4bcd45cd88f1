// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

/// Errors that can occur while collecting and emitting run summaries.
///
/// Every variant is fatal at the batch level: there is no per-run isolation
/// and no retry besides the fixed-interval poll loop in [`crate::poller`].
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    /// Required configuration is absent. Raised before any work starts.
    #[error("missing required input: {0}")]
    InputMissing(String),

    /// A referenced dataset or run does not exist on the platform.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// A remote call failed at the HTTP level.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A remote call succeeded but returned a body we cannot interpret.
    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),

    /// The polling protocol exhausted its configured bound without the
    /// remote job producing a result id. Unreachable with the default
    /// unbounded poller.
    #[error("query result unavailable after polling")]
    ResultUnavailable,
}
