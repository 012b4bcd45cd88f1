// Copyright 2025-Present the run-triage authors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::env;
use std::process;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use run_triage::{
    emit_sorted, ChartsQuerySource, Config, DatasetSource, HttpChartsClient, HttpDatasetSink,
    HttpPlatformClient, JobPoller, RunRecord, RunSource, RunSourceConfig, RunStatsCollector,
    TriageError,
};

#[tokio::main]
pub async fn main() {
    let log_level = env::var("TRIAGE_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("hyper=off,rustls=off,reqwest=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Error creating config on run triage startup: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&config).await {
        error!("Run triage batch failed: {e}");
        process::exit(1);
    }
}

async fn run(config: &Config) -> Result<(), TriageError> {
    let records = fetch_runs(config).await?;
    info!("Collected {} runs to triage", records.len());

    let platform = HttpPlatformClient::new(
        config.platform_url.clone(),
        config.platform_token.clone(),
    );
    let collector = RunStatsCollector::new(platform);
    let summaries = collector.collect(records).await?;

    let sink = HttpDatasetSink::new(
        config.platform_url.clone(),
        config.output_dataset_id.clone(),
        config.platform_token.clone(),
    );
    emit_sorted(&sink, summaries).await?;
    info!("Summary records written to dataset {}", config.output_dataset_id);
    Ok(())
}

async fn fetch_runs(config: &Config) -> Result<Vec<RunRecord>, TriageError> {
    match &config.source {
        RunSourceConfig::Dataset { dataset_id } => {
            debug!("Direct mode: listing dataset {dataset_id}");
            let platform = HttpPlatformClient::new(
                config.platform_url.clone(),
                config.platform_token.clone(),
            );
            DatasetSource::new(platform, dataset_id.clone())
                .fetch_runs()
                .await
        }
        RunSourceConfig::Query {
            charts_url,
            charts_token,
            query_id,
            parameters,
        } => {
            debug!("Query mode: running charts query {query_id}");
            let client =
                HttpChartsClient::new(charts_url.clone(), *query_id, charts_token.clone());
            let poller = JobPoller::new(client)
                .with_poll_interval(config.poll_interval)
                .with_max_polls(config.max_polls);
            ChartsQuerySource::new(poller, parameters.clone())
                .fetch_runs()
                .await
        }
    }
}
