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

use google_cloud_api_serviceusage_v1 as serviceusage;
use google_cloud_lro::Poller;

/// Enables a service on the project and waits for the operation to finish.
pub async fn enable_api(
    client: &serviceusage::client::ServiceUsage,
    project_id: &str,
    service: &str,
) -> crate::Result<()> {
    tracing::info!("enabling API {service} on {project_id}");
    client
        .enable_service()
        .set_name(format!("projects/{project_id}/services/{service}"))
        .poller()
        .until_done()
        .await?;
    Ok(())
}
