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

//! BigQuery configuration: datasets, the customer group's access grants,
//! and the daily query quotas.

use crate::auth::PROVISIONER_SERVICE_ACCOUNT;
use crate::config::{DEFAULT_TABLE_EXPIRATION_MS, NO_EXPIRATION_DATASET, Settings};
use crate::{quotas, services};
use google_cloud_api_cloudquotas_v1 as cloudquotas;
use google_cloud_api_serviceusage_v1 as serviceusage;
use google_cloud_bigquery_v2 as bigquery;
use google_cloud_gax as gax;
use bigquery::model::{Access, Dataset, DatasetReference};
use gax::error::rpc::Code;

/// Enables the BigQuery APIs, creates every configured dataset, grants the
/// customer group access per dataset category, and sets the query quotas.
pub async fn configure(
    usage: &serviceusage::client::ServiceUsage,
    datasets: &bigquery::client::DatasetService,
    quota_preferences: &cloudquotas::client::CloudQuotas,
    settings: &Settings,
) -> crate::Result<()> {
    tracing::info!("configuring BigQuery for {}", settings.project_id);
    for api in [
        "bigquery.googleapis.com",
        "bigqueryreservation.googleapis.com",
        "logging.googleapis.com",
    ] {
        services::enable_api(usage, &settings.project_id, api).await?;
    }

    create_datasets(datasets, settings).await?;
    grant_dataset_access(datasets, settings).await?;

    tracing::info!("setting query quotas for {}", settings.project_id);
    quotas::set_query_quotas(
        quota_preferences,
        &settings.project_id,
        settings.project_quota,
        settings.user_quota,
    )
    .await?;
    Ok(())
}

/// Creates the standard, customer, and extra datasets. Datasets that
/// already exist are left untouched.
pub async fn create_datasets(
    datasets: &bigquery::client::DatasetService,
    settings: &Settings,
) -> crate::Result<()> {
    for dataset_id in settings.all_datasets() {
        tracing::info!("creating dataset {dataset_id}");
        let result = datasets
            .insert_dataset()
            .set_project_id(&settings.project_id)
            .set_dataset(
                Dataset::new().set_dataset_reference(
                    DatasetReference::new()
                        .set_project_id(&settings.project_id)
                        .set_dataset_id(dataset_id),
                ),
            )
            .send()
            .await;
        match result {
            Ok(_) => {}
            Err(e) if is_already_exists(&e) => {
                tracing::info!("dataset {dataset_id} already exists");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Grants the customer group `READER` on the standard datasets and
/// `WRITER` on the customer datasets. Every granted dataset except
/// `Region_Files` also gets the default table expiration.
pub async fn grant_dataset_access(
    datasets: &bigquery::client::DatasetService,
    settings: &Settings,
) -> crate::Result<()> {
    for (dataset_id, role) in settings.dataset_grants() {
        tracing::info!("granting customer {role} on dataset {dataset_id}");
        let entry = Access::new()
            .set_role(role)
            .set_group_by_email(&settings.group_name);
        let expiration = (dataset_id != NO_EXPIRATION_DATASET)
            .then_some(DEFAULT_TABLE_EXPIRATION_MS);
        apply_access(datasets, &settings.project_id, dataset_id, entry, expiration).await?;
    }
    Ok(())
}

/// Reads a dataset, merges `entry` into its access list, and patches the
/// dataset. Used for both the customer group grants and the log sink's
/// writer identity (see [crate::logging]).
pub async fn apply_access(
    datasets: &bigquery::client::DatasetService,
    project_id: &str,
    dataset_id: &str,
    entry: Access,
    expiration_ms: Option<i64>,
) -> crate::Result<()> {
    let dataset = datasets
        .get_dataset()
        .set_project_id(project_id)
        .set_dataset_id(dataset_id)
        .send()
        .await?;
    let mut update = Dataset::new().set_access(merged_access(dataset.access, entry));
    if let Some(ms) = expiration_ms {
        update = update.set_default_table_expiration_ms(ms);
    }
    datasets
        .patch_dataset()
        .set_project_id(project_id)
        .set_dataset_id(dataset_id)
        .set_dataset(update)
        .send()
        .await?;
    Ok(())
}

/// Merges a new access entry into an existing access list.
///
/// Entries belonging to the provisioning service account are dropped, as
/// is any stale entry for the same entity as `entry`, so that re-running
/// the tool does not accumulate duplicates.
pub fn merged_access(existing: Vec<Access>, entry: Access) -> Vec<Access> {
    let mut access: Vec<Access> = existing
        .into_iter()
        .filter(|e| e.user_by_email != PROVISIONER_SERVICE_ACCOUNT)
        .filter(|e| !same_entity(e, &entry))
        .collect();
    access.push(entry);
    access
}

fn same_entity(existing: &Access, entry: &Access) -> bool {
    (!entry.group_by_email.is_empty() && existing.group_by_email == entry.group_by_email)
        || (!entry.iam_member.is_empty() && existing.iam_member == entry.iam_member)
}

fn is_already_exists(e: &gax::error::Error) -> bool {
    e.status().is_some_and(|s| s.code == Code::AlreadyExists)
}
