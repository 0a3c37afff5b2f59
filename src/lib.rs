// This file is part of the terraform-provider-bunny project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Terraform provider for the bunny.net CDN
//!
//! The provider exposes pull zones, edge rules, hostnames, storage zones and video libraries
//! as resources, and pull zones as a data source.
//! Each resource translates its Terraform state into requests of the [`bunny_client`] crate,
//! and reconciles the API responses back into state.

mod edgerule;
mod fields;
mod hostname;
mod provider;
mod pullzone;
mod sets;
mod storagezone;
mod utils;
mod videolibrary;

pub mod logging;

pub use provider::{BunnyProvider, ClientHandle};
