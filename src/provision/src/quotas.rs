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

//! Daily BigQuery query quotas, managed as Cloud Quotas preferences.
//!
//! Two quotas are set on `bigquery.googleapis.com`: `QueryUsagePerDay`
//! (unit `1/d/{project}`) and `QueryUsagePerUserPerDay` (unit
//! `1/d/{project}/{user}`). An existing preference for a quota is
//! updated in place; otherwise one is created.

use cloudquotas::model::{QuotaConfig, QuotaPreference, QuotaSafetyCheck};
use google_cloud_api_cloudquotas_v1 as cloudquotas;

pub const BIGQUERY_SERVICE: &str = "bigquery.googleapis.com";

struct QuotaTarget {
    quota_id: &'static str,
    preference_id: &'static str,
    value_mb: i64,
}

fn quota_targets(project_quota_mb: i64, user_quota_mb: i64) -> [QuotaTarget; 2] {
    [
        QuotaTarget {
            quota_id: "QueryUsagePerDay",
            preference_id: "bigquery-query-usage-per-day",
            value_mb: project_quota_mb,
        },
        QuotaTarget {
            quota_id: "QueryUsagePerUserPerDay",
            preference_id: "bigquery-query-usage-per-user-per-day",
            value_mb: user_quota_mb,
        },
    ]
}

/// Sets the per-project and per-user daily query quotas on the project.
pub async fn set_query_quotas(
    client: &cloudquotas::client::CloudQuotas,
    project_id: &str,
    project_quota_mb: i64,
    user_quota_mb: i64,
) -> crate::Result<()> {
    let parent = format!("projects/{project_id}/locations/global");
    let existing = list_preferences(client, &parent).await?;

    for target in quota_targets(project_quota_mb, user_quota_mb) {
        let preference = QuotaPreference::new()
            .set_service(BIGQUERY_SERVICE)
            .set_quota_id(target.quota_id)
            .set_quota_config(QuotaConfig::new().set_preferred_value(target.value_mb));
        // Quota decreases below current usage are forced through, matching
        // how the tool always behaved for existing customers.
        let safety_overrides = [
            QuotaSafetyCheck::QuotaDecreaseBelowUsage,
            QuotaSafetyCheck::QuotaDecreasePercentageTooHigh,
        ];
        match find_preference(&existing, target.quota_id) {
            Some(current) => {
                tracing::info!(
                    "updating quota preference {} ({} MB)",
                    current.name,
                    target.value_mb
                );
                client
                    .update_quota_preference()
                    .set_quota_preference(preference.set_name(&current.name))
                    .set_ignore_safety_checks(safety_overrides)
                    .send()
                    .await?;
            }
            None => {
                tracing::info!(
                    "creating quota preference {} ({} MB)",
                    target.preference_id,
                    target.value_mb
                );
                client
                    .create_quota_preference()
                    .set_parent(&parent)
                    .set_quota_preference_id(target.preference_id)
                    .set_quota_preference(preference)
                    .set_ignore_safety_checks(safety_overrides)
                    .send()
                    .await?;
            }
        }
    }
    Ok(())
}

async fn list_preferences(
    client: &cloudquotas::client::CloudQuotas,
    parent: &str,
) -> crate::Result<Vec<QuotaPreference>> {
    let mut preferences = Vec::new();
    let mut page_token = String::new();
    loop {
        let page = client
            .list_quota_preferences()
            .set_parent(parent)
            .set_page_token(&page_token)
            .send()
            .await?;
        preferences.extend(page.quota_preferences);
        page_token = page.next_page_token;
        if page_token.is_empty() {
            break;
        }
    }
    Ok(preferences)
}

fn find_preference<'a>(
    preferences: &'a [QuotaPreference],
    quota_id: &str,
) -> Option<&'a QuotaPreference> {
    preferences
        .iter()
        .find(|p| p.service == BIGQUERY_SERVICE && p.quota_id == quota_id)
}
