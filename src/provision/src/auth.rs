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

use google_cloud_auth::credentials::Builder as AdcCredentialsBuilder;
use google_cloud_auth::credentials::Credentials;
use google_cloud_auth::credentials::impersonated::Builder as ImpersonatedCredentialsBuilder;

/// The service account every provisioning call runs as.
///
/// Dataset ACL entries belonging to this account are stripped after
/// provisioning, see [crate::bigquery].
pub const PROVISIONER_SERVICE_ACCOUNT: &str =
    "cs-create-customer-projects@tutela-auxiliary-team.iam.gserviceaccount.com";

/// Builds credentials that impersonate the provisioning service account,
/// starting from the application-default credentials.
pub fn provisioner_credentials() -> crate::Result<Credentials> {
    let source = AdcCredentialsBuilder::default().build()?;
    let credentials = ImpersonatedCredentialsBuilder::from_source_credentials(source)
        .with_target_principal(PROVISIONER_SERVICE_ACCOUNT)
        .build()?;
    Ok(credentials)
}
