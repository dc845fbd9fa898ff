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

use clap::Parser;
use std::path::PathBuf;

/// Command-line flags.
///
/// Every provisioning value may come from the command line or from the
/// YAML file named by `--config`; flags win. Validation happens after the
/// two sources are merged, in [crate::config::Settings::resolve].
#[derive(Clone, Debug, Parser)]
#[command(version, about = "Create a new Google Cloud setup for a customer")]
pub struct Args {
    /// The id of the project to create.
    #[arg(long, short = 'p')]
    pub project_id: Option<String>,

    /// The name of the customer.
    #[arg(long, short = 'c')]
    pub customer_name: Option<String>,

    /// The customer group email. Derived from the customer name when absent.
    #[arg(long)]
    pub group_name: Option<String>,

    /// A dataset the customer has read access to. Repeatable.
    #[arg(long = "standard-dataset", visible_alias = "sd")]
    pub standard_datasets: Vec<String>,

    /// A dataset the customer has read/write access to. Repeatable.
    #[arg(long = "customer-dataset", visible_alias = "cd")]
    pub customer_datasets: Vec<String>,

    /// A dataset the customer has no access to. Repeatable.
    #[arg(long = "extra-dataset", visible_alias = "ed")]
    pub extra_datasets: Vec<String>,

    /// Project daily query quota, in MB.
    #[arg(long, visible_alias = "pq")]
    pub project_quota: Option<i64>,

    /// Per-user daily query quota, in MB.
    #[arg(long, visible_alias = "uq")]
    pub user_quota: Option<i64>,

    /// Create the project under the customer-trials folder.
    #[arg(long, default_value_t = false)]
    pub trial: bool,

    /// Path to a YAML config file supplying any of the other flags.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
