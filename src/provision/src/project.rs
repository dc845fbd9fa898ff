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

//! Project creation: the project itself, its billing link, and its IAM
//! role bindings.

use crate::config::{BILLING_ACCOUNT_ID, EXTERNAL_CUSTOMER_ROLE, OWNER_MEMBER, Settings};
use crate::services;
use google_cloud_api_serviceusage_v1 as serviceusage;
use google_cloud_billing_v1 as billing;
use google_cloud_iam_v1 as iam_v1;
use google_cloud_lro::Poller;
use google_cloud_resourcemanager_v3 as resourcemanager;
use iam_v1::model::{Binding, Policy};

/// Creates the customer project, links the billing account, and assigns
/// the owner and external-customer roles.
pub async fn create(
    projects: &resourcemanager::client::Projects,
    usage: &serviceusage::client::ServiceUsage,
    billing: &billing::client::CloudBilling,
    settings: &Settings,
) -> crate::Result<()> {
    tracing::info!("creating project {}", settings.project_id);
    let project = projects
        .create_project()
        .set_project(
            resourcemanager::model::Project::new()
                .set_parent(settings.parent())
                .set_project_id(&settings.project_id)
                .set_display_name(&settings.project_id),
        )
        .poller()
        .until_done()
        .await?;
    tracing::info!("created {}", project.name);

    link_billing_account(usage, billing, &settings.project_id).await?;
    assign_roles(projects, settings).await?;
    Ok(())
}

/// Links the fixed billing account to the new project.
///
/// The billing API must be enabled on the project before its billing info
/// can be updated.
async fn link_billing_account(
    usage: &serviceusage::client::ServiceUsage,
    billing: &billing::client::CloudBilling,
    project_id: &str,
) -> crate::Result<()> {
    services::enable_api(usage, project_id, "cloudbilling.googleapis.com").await?;
    tracing::info!("linking billing account to {project_id}");
    billing
        .update_project_billing_info()
        .set_name(format!("projects/{project_id}"))
        .set_project_billing_info(
            billing::model::ProjectBillingInfo::new()
                .set_billing_account_name(format!("billingAccounts/{BILLING_ACCOUNT_ID}")),
        )
        .send()
        .await?;
    Ok(())
}

async fn assign_roles(
    projects: &resourcemanager::client::Projects,
    settings: &Settings,
) -> crate::Result<()> {
    let resource = format!("projects/{}", settings.project_id);
    let policy = projects
        .get_iam_policy()
        .set_resource(&resource)
        .send()
        .await?;
    let policy = grant_customer_roles(policy, &settings.group_name);
    tracing::info!("assigning roles on {resource}");
    projects
        .set_iam_policy()
        .set_resource(&resource)
        .set_policy(policy)
        .send()
        .await?;
    Ok(())
}

/// Returns the policy with the owner and external-customer bindings in
/// place. An existing binding for either role has its members replaced;
/// otherwise a new binding is appended.
pub fn grant_customer_roles(policy: Policy, group_name: &str) -> Policy {
    let grants = [
        ("roles/owner", OWNER_MEMBER.to_string()),
        (EXTERNAL_CUSTOMER_ROLE, format!("group:{group_name}")),
    ];
    grants
        .into_iter()
        .fold(policy, |policy, (role, member)| upsert_binding(policy, role, member))
}

fn upsert_binding(mut policy: Policy, role: &str, member: String) -> Policy {
    match policy.bindings.iter_mut().find(|b| b.role == role) {
        Some(binding) => binding.members = vec![member],
        None => policy
            .bindings
            .push(Binding::new().set_role(role).set_members([member])),
    }
    policy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_appends_missing_bindings() {
        let policy = grant_customer_roles(Policy::new(), "acme@comlinkdata.com");
        assert_eq!(policy.bindings.len(), 2);
        let owner = policy
            .bindings
            .iter()
            .find(|b| b.role == "roles/owner")
            .unwrap();
        assert_eq!(owner.members, vec![OWNER_MEMBER.to_string()]);
        let external = policy
            .bindings
            .iter()
            .find(|b| b.role == EXTERNAL_CUSTOMER_ROLE)
            .unwrap();
        assert_eq!(external.members, vec!["group:acme@comlinkdata.com".to_string()]);
    }

    #[test]
    fn grant_replaces_existing_members() {
        let policy = Policy::new().set_bindings([
            Binding::new()
                .set_role("roles/owner")
                .set_members(["user:stale@example.com", "user:older@example.com"]),
            Binding::new()
                .set_role("roles/viewer")
                .set_members(["user:keep@example.com"]),
        ]);
        let policy = grant_customer_roles(policy, "acme@comlinkdata.com");
        assert_eq!(policy.bindings.len(), 3);
        let owner = policy
            .bindings
            .iter()
            .find(|b| b.role == "roles/owner")
            .unwrap();
        assert_eq!(owner.members, vec![OWNER_MEMBER.to_string()]);
        let viewer = policy
            .bindings
            .iter()
            .find(|b| b.role == "roles/viewer")
            .unwrap();
        assert_eq!(viewer.members, vec!["user:keep@example.com".to_string()]);
    }
}
