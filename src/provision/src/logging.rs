// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The query-usage log sink: BigQuery job-completion events exported into
//! the `Logs` dataset.

use crate::bigquery;
use crate::config::LOGS_DATASET;
use gax::error::rpc::Code;
use google_cloud_bigquery_v2 as bigquery_v2;
use google_cloud_gax as gax;
use google_cloud_logging_v2 as logging;
use logging::model::{BigQueryOptions, LogSink};

/// Name of the sink in every customer project.
pub const SINK_NAME: &str = "BQ_Query_Usage";

const SINK_FILTER: &str = concat!(
    r#"resource.type="bigquery_resource" "#,
    r#"protoPayload.serviceData.jobCompletedEvent.eventName="query_job_completed""#,
);

/// Creates the query-usage sink (or fetches it if it already exists) and
/// grants its writer identity editor access on the `Logs` dataset.
pub async fn configure(
    sinks: &logging::client::ConfigServiceV2,
    datasets: &bigquery_v2::client::DatasetService,
    project_id: &str,
) -> crate::Result<()> {
    let sink = get_or_create_sink(sinks, project_id).await?;
    tracing::info!(
        "granting {} editor access on dataset {LOGS_DATASET}",
        sink.writer_identity
    );
    let entry = bigquery_v2::model::Access::new()
        .set_role("roles/bigquery.dataEditor")
        .set_iam_member(&sink.writer_identity);
    bigquery::apply_access(datasets, project_id, LOGS_DATASET, entry, None).await?;
    Ok(())
}

async fn get_or_create_sink(
    sinks: &logging::client::ConfigServiceV2,
    project_id: &str,
) -> crate::Result<LogSink> {
    let sink_name = format!("projects/{project_id}/sinks/{SINK_NAME}");
    match sinks.get_sink().set_sink_name(&sink_name).send().await {
        Ok(sink) => {
            tracing::info!("sink {sink_name} already exists");
            Ok(sink)
        }
        Err(e) if is_not_found(&e) => {
            tracing::info!("creating sink {sink_name}");
            let sink = sinks
                .create_sink()
                .set_parent(format!("projects/{project_id}"))
                .set_unique_writer_identity(true)
                .set_sink(
                    LogSink::new()
                        .set_name(SINK_NAME)
                        .set_description("Standard Big Query Logging")
                        .set_destination(format!(
                            "bigquery.googleapis.com/projects/{project_id}/datasets/{LOGS_DATASET}"
                        ))
                        .set_filter(SINK_FILTER)
                        .set_bigquery_options(
                            BigQueryOptions::new().set_use_partitioned_tables(true),
                        ),
                )
                .send()
                .await?;
            Ok(sink)
        }
        Err(e) => Err(e.into()),
    }
}

fn is_not_found(e: &gax::error::Error) -> bool {
    e.status().is_some_and(|s| s.code == Code::NotFound)
}
