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

//! Bucket creation against a mocked storage control client.

use customer_projects::storage;
use gax::response::Response;
use google_cloud_gax as gax;
use google_cloud_storage as gcs;

mockall::mock! {
    #[derive(Debug)]
    StorageControl {}
    impl gcs::stub::StorageControl for StorageControl {
        async fn create_bucket(&self, req: gcs::model::CreateBucketRequest, _options: gax::options::RequestOptions) -> gax::Result<Response<gcs::model::Bucket>>;
    }
}

#[tokio::test]
async fn bucket_is_named_after_the_project() -> anyhow::Result<()> {
    let mut mock = MockStorageControl::new();
    mock.expect_create_bucket()
        .withf(|r, _| {
            r.parent == "projects/_"
                && r.bucket_id == "acme-analytics"
                && r.bucket
                    .as_ref()
                    .is_some_and(|b| b.project == "projects/acme-analytics")
        })
        .return_once(|_, _| {
            Ok(Response::from(
                gcs::model::Bucket::new().set_name("projects/_/buckets/acme-analytics"),
            ))
        });

    let client = gcs::client::StorageControl::from_stub(mock);
    storage::create_bucket(&client, "acme-analytics").await?;
    Ok(())
}
