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

//! Log-sink setup against mocked logging and BigQuery clients.

use customer_projects::logging::{self, SINK_NAME};
use gax::error::Error;
use gax::error::rpc::{Code, Status};
use gax::response::Response;
use google_cloud_bigquery_v2 as bigquery_v2;
use google_cloud_gax as gax;
use google_cloud_logging_v2 as logging_v2;
use bigquery_v2::model::Dataset;
use logging_v2::model::LogSink;

const WRITER_IDENTITY: &str =
    "serviceAccount:service-123456789@gcp-sa-logging.iam.gserviceaccount.com";

mockall::mock! {
    #[derive(Debug)]
    ConfigServiceV2 {}
    impl logging_v2::stub::ConfigServiceV2 for ConfigServiceV2 {
        async fn get_sink(&self, req: logging_v2::model::GetSinkRequest, _options: gax::options::RequestOptions) -> gax::Result<Response<LogSink>>;
        async fn create_sink(&self, req: logging_v2::model::CreateSinkRequest, _options: gax::options::RequestOptions) -> gax::Result<Response<LogSink>>;
    }
}

mockall::mock! {
    #[derive(Debug)]
    DatasetService {}
    impl bigquery_v2::stub::DatasetService for DatasetService {
        async fn get_dataset(&self, req: bigquery_v2::model::GetDatasetRequest, _options: gax::options::RequestOptions) -> gax::Result<Response<Dataset>>;
        async fn patch_dataset(&self, req: bigquery_v2::model::UpdateOrPatchDatasetRequest, _options: gax::options::RequestOptions) -> gax::Result<Response<Dataset>>;
    }
}

fn expect_logs_dataset_grant(mock: &mut MockDatasetService) {
    mock.expect_get_dataset()
        .withf(|r, _| r.project_id == "acme-analytics" && r.dataset_id == "Logs")
        .times(1)
        .returning(|_, _| Ok(Response::from(Dataset::new())));
    mock.expect_patch_dataset()
        .withf(|r, _| {
            let Some(dataset) = r.dataset.as_ref() else {
                return false;
            };
            r.dataset_id == "Logs"
                && dataset.access.iter().any(|a| {
                    a.role == "roles/bigquery.dataEditor" && a.iam_member == WRITER_IDENTITY
                })
                && dataset.default_table_expiration_ms.is_none()
        })
        .times(1)
        .returning(|r, _| Ok(Response::from(r.dataset.unwrap())));
}

#[tokio::test]
async fn creates_sink_when_absent_and_grants_writer_identity() -> anyhow::Result<()> {
    let mut sinks = MockConfigServiceV2::new();
    sinks
        .expect_get_sink()
        .withf(|r, _| r.sink_name == format!("projects/acme-analytics/sinks/{SINK_NAME}"))
        .return_once(|_, _| {
            Err(Error::service(
                Status::default()
                    .set_code(Code::NotFound)
                    .set_message("sink not found"),
            ))
        });
    sinks
        .expect_create_sink()
        .withf(|r, _| {
            let Some(sink) = r.sink.as_ref() else {
                return false;
            };
            r.parent == "projects/acme-analytics"
                && r.unique_writer_identity
                && sink.name == SINK_NAME
                && sink.destination
                    == "bigquery.googleapis.com/projects/acme-analytics/datasets/Logs"
                && sink.filter.contains("query_job_completed")
        })
        .return_once(|r, _| {
            Ok(Response::from(
                r.sink.unwrap().set_writer_identity(WRITER_IDENTITY),
            ))
        });

    let mut datasets = MockDatasetService::new();
    expect_logs_dataset_grant(&mut datasets);

    let sinks = logging_v2::client::ConfigServiceV2::from_stub(sinks);
    let datasets = bigquery_v2::client::DatasetService::from_stub(datasets);
    logging::configure(&sinks, &datasets, "acme-analytics").await?;
    Ok(())
}

#[tokio::test]
async fn reuses_existing_sink() -> anyhow::Result<()> {
    let mut sinks = MockConfigServiceV2::new();
    sinks.expect_get_sink().return_once(|_, _| {
        Ok(Response::from(
            LogSink::new()
                .set_name(SINK_NAME)
                .set_writer_identity(WRITER_IDENTITY),
        ))
    });

    let mut datasets = MockDatasetService::new();
    expect_logs_dataset_grant(&mut datasets);

    let sinks = logging_v2::client::ConfigServiceV2::from_stub(sinks);
    let datasets = bigquery_v2::client::DatasetService::from_stub(datasets);
    logging::configure(&sinks, &datasets, "acme-analytics").await?;
    Ok(())
}
