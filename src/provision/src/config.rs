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

//! Resolved provisioning settings.
//!
//! Values come from three layers, highest precedence first: command-line
//! flags, the optional YAML config file, and built-in defaults.

use crate::args::Args;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::Path;

/// Parent folder for regular customer projects.
pub const CUSTOMERS_FOLDER_ID: i64 = 152141514306;

/// Parent folder for customer trial projects.
pub const CUSTOMER_TRIALS_FOLDER_ID: i64 = 338987899866;

/// Billing account linked to every customer project.
pub const BILLING_ACCOUNT_ID: &str = "015E69-2DE2C4-D9B22D";

/// Member granted `roles/owner` on every customer project.
pub const OWNER_MEMBER: &str = "user:tutela@tutelatech.com";

/// Organization-level role granted to the customer group.
pub const EXTERNAL_CUSTOMER_ROLE: &str =
    "organizations/48397401872/roles/ExternalCustomerRole";

/// Domain of the derived customer group address.
pub const GROUP_DOMAIN: &str = "comlinkdata.com";

/// Dataset receiving the exported BigQuery audit logs.
pub const LOGS_DATASET: &str = "Logs";

/// The one dataset whose tables never expire.
pub const NO_EXPIRATION_DATASET: &str = "Region_Files";

/// Default table expiration applied to standard and customer datasets:
/// 548 days, in milliseconds.
pub const DEFAULT_TABLE_EXPIRATION_MS: i64 = 548 * 24 * 60 * 60 * 1000;

const DEFAULT_STANDARD_DATASETS: &[&str] =
    &["ONX360", "ONXData", "ONXFocus", "ONXSpotlight", "Region_Files"];

const DEFAULT_EXTRA_DATASETS: &[&str] = &["Opensignal", "Logs"];

const DEFAULT_PROJECT_QUOTA_MB: i64 = 40 * 1024 * 1024;

const DEFAULT_USER_QUOTA_MB: i64 = 10 * 1024 * 1024;

/// Optional keys accepted in the YAML config file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub project_id: Option<String>,
    pub customer_name: Option<String>,
    pub group_name: Option<String>,
    pub standard_datasets: Option<Vec<String>>,
    pub customer_datasets: Option<Vec<String>>,
    pub extra_datasets: Option<Vec<String>>,
    pub project_quota: Option<i64>,
    pub user_quota: Option<i64>,
    pub trial: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&contents)
            .with_context(|| format!("cannot parse config file {}", path.display()))?;
        Ok(config)
    }
}

/// Fully resolved and validated provisioning settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub project_id: String,
    pub customer_name: String,
    /// Customer group granted dataset access and the external customer role.
    pub group_name: String,
    /// Datasets the customer group can read.
    pub standard_datasets: Vec<String>,
    /// Datasets the customer group can write.
    pub customer_datasets: Vec<String>,
    /// Datasets the customer group cannot access.
    pub extra_datasets: Vec<String>,
    /// Daily query quota for the whole project, in MB.
    pub project_quota: i64,
    /// Daily query quota per user, in MB.
    pub user_quota: i64,
    /// Create the project under the trials folder.
    pub trial: bool,
}

impl Settings {
    /// Merges the three configuration layers and validates the result.
    pub fn resolve(args: &Args, file: ConfigFile) -> crate::Result<Self> {
        let project_id = args
            .project_id
            .clone()
            .or(file.project_id)
            .context("a project id is required (--project-id or the config file)")?;
        let customer_name = args
            .customer_name
            .clone()
            .or(file.customer_name)
            .context("a customer name is required (--customer-name or the config file)")?;
        validate_project_id(&project_id)?;
        validate_customer_name(&customer_name)?;

        let group_name = args
            .group_name
            .clone()
            .or(file.group_name)
            .unwrap_or_else(|| derive_group_name(&customer_name));

        let standard_datasets = pick_datasets(
            &args.standard_datasets,
            file.standard_datasets,
            DEFAULT_STANDARD_DATASETS,
        );
        let customer_datasets = pick_datasets(
            &args.customer_datasets,
            file.customer_datasets,
            std::slice::from_ref(&customer_name.as_str()),
        );
        let extra_datasets = pick_datasets(
            &args.extra_datasets,
            file.extra_datasets,
            DEFAULT_EXTRA_DATASETS,
        );

        let project_quota = args
            .project_quota
            .or(file.project_quota)
            .unwrap_or(DEFAULT_PROJECT_QUOTA_MB);
        let user_quota = args.user_quota.or(file.user_quota).unwrap_or(DEFAULT_USER_QUOTA_MB);
        if project_quota <= 0 || user_quota <= 0 {
            bail!("query quotas must be positive");
        }

        Ok(Settings {
            project_id,
            customer_name,
            group_name,
            standard_datasets,
            customer_datasets,
            extra_datasets,
            project_quota,
            user_quota,
            trial: args.trial || file.trial.unwrap_or(false),
        })
    }

    /// The folder resource the project is created under.
    pub fn parent(&self) -> String {
        let folder = if self.trial {
            CUSTOMER_TRIALS_FOLDER_ID
        } else {
            CUSTOMERS_FOLDER_ID
        };
        format!("folders/{folder}")
    }

    /// All datasets to create, in creation order.
    pub fn all_datasets(&self) -> impl Iterator<Item = &String> {
        self.standard_datasets
            .iter()
            .chain(&self.customer_datasets)
            .chain(&self.extra_datasets)
    }

    /// Dataset/role pairs for the customer group grants.
    pub fn dataset_grants(&self) -> impl Iterator<Item = (&String, &'static str)> {
        self.standard_datasets
            .iter()
            .map(|d| (d, "READER"))
            .chain(self.customer_datasets.iter().map(|d| (d, "WRITER")))
    }
}

fn pick_datasets(cli: &[String], file: Option<Vec<String>>, default: &[&str]) -> Vec<String> {
    if !cli.is_empty() {
        return cli.to_vec();
    }
    file.unwrap_or_else(|| default.iter().map(|d| d.to_string()).collect())
}

/// Derives the customer group address from the customer name.
pub fn derive_group_name(customer_name: &str) -> String {
    let customer = customer_name.replace(' ', "").to_lowercase();
    format!("tutela-external-{customer}@{GROUP_DOMAIN}")
}

/// Validates a project id against the Cloud Resource Manager grammar.
///
/// See https://cloud.google.com/resource-manager/reference/rest/v3/projects
/// for the `projectId` field description: 6 to 30 lowercase letters, digits,
/// or hyphens, starting with a letter and not ending with a hyphen.
pub fn validate_project_id(project_id: &str) -> crate::Result<()> {
    let grammar = regex::Regex::new(r"^[a-z][a-z0-9-]{4,28}[a-z0-9]$").unwrap();
    if !grammar.is_match(project_id) {
        bail!(
            "invalid project id `{project_id}`: must be 6 to 30 lowercase letters, \
             digits, or hyphens, start with a letter, and not end with a hyphen"
        );
    }
    Ok(())
}

/// Validates a customer name: 1 to 1024 letters, digits, or underscores,
/// starting with a letter or digit.
pub fn validate_customer_name(customer_name: &str) -> crate::Result<()> {
    let grammar = regex::Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_]{0,1023}$").unwrap();
    if !grammar.is_match(customer_name) {
        bail!(
            "invalid customer name `{customer_name}`: must be 1 to 1024 letters, \
             digits, or underscores, and start with a letter or digit"
        );
    }
    Ok(())
}
