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

//! Provision a Google Cloud project for a new customer.
//!
//! The provisioning workflow is a fixed sequence: create the project and
//! link billing, assign IAM roles, configure BigQuery (datasets, access
//! grants, query quotas), export BigQuery job-completion events through a
//! log sink, and create a storage bucket. Each stage depends on resources
//! created by the previous one, so the stages run strictly in order.

pub mod args;
pub mod auth;
pub mod bigquery;
pub mod config;
pub mod logging;
pub mod project;
pub mod quotas;
pub mod services;
pub mod storage;

pub type Result<T> = anyhow::Result<T>;
