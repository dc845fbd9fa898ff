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

use anyhow::Result;
use clap::Parser;
use customer_projects::args::Args;
use customer_projects::config::{ConfigFile, Settings};
use customer_projects::{auth, bigquery, logging, project, storage};
use google_cloud_api_cloudquotas_v1 as cloudquotas;
use google_cloud_api_serviceusage_v1 as serviceusage;
use google_cloud_bigquery_v2 as bigquery_v2;
use google_cloud_billing_v1 as billing;
use google_cloud_logging_v2 as logging_v2;
use google_cloud_resourcemanager_v3 as resourcemanager;
use google_cloud_storage as gcs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = enable_tracing();

    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let settings = Settings::resolve(&args, file)?;
    tracing::info!("Provisioning configuration: {settings:?}");

    let credentials = auth::provisioner_credentials()?;
    let projects = resourcemanager::client::Projects::builder()
        .with_credentials(credentials.clone())
        .build()
        .await?;
    let usage = serviceusage::client::ServiceUsage::builder()
        .with_credentials(credentials.clone())
        .build()
        .await?;
    let billing = billing::client::CloudBilling::builder()
        .with_credentials(credentials.clone())
        .build()
        .await?;
    let quotas = cloudquotas::client::CloudQuotas::builder()
        .with_credentials(credentials.clone())
        .build()
        .await?;
    let datasets = bigquery_v2::client::DatasetService::builder()
        .with_credentials(credentials.clone())
        .build()
        .await?;
    let sinks = logging_v2::client::ConfigServiceV2::builder()
        .with_credentials(credentials.clone())
        .build()
        .await?;
    let storage_control = gcs::client::StorageControl::builder()
        .with_credentials(credentials)
        .build()
        .await?;

    project::create(&projects, &usage, &billing, &settings).await?;
    bigquery::configure(&usage, &datasets, &quotas, &settings).await?;
    logging::configure(&sinks, &datasets, &settings.project_id).await?;
    storage::create_bucket(&storage_control, &settings.project_id).await?;

    tracing::info!("project {} provisioned", settings.project_id);
    Ok(())
}

fn enable_tracing() -> tracing::dispatcher::DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .finish();

    tracing::subscriber::set_default(subscriber)
}
