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

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use bunny_client::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{map, Diagnostics, DynamicDataSource, DynamicResource, Provider};

use crate::edgerule::EdgeRuleResource;
use crate::hostname::HostnameResource;
use crate::pullzone::{PullZoneDataSource, PullZoneResource};
use crate::storagezone::StorageZoneResource;
use crate::videolibrary::VideoLibraryResource;

/// Environment variable read when `api_key` is not configured
pub const API_KEY_ENV: &str = "BUNNY_API_KEY";

/// Client shared between the provider and its resources
///
/// The client only exists once the provider has been configured.
#[derive(Debug, Clone, Default)]
pub struct ClientHandle(Arc<OnceLock<Client>>);

impl ClientHandle {
    /// Store the client, returns false if one was already stored
    pub fn set(&self, client: Client) -> bool {
        self.0.set(client).is_ok()
    }

    /// Get the configured client, or report that the provider is not configured
    pub fn get(&self, diags: &mut Diagnostics) -> Option<&Client> {
        let client = self.0.get();
        if client.is_none() {
            diags.root_error(
                "provider is not configured",
                "the bunny provider must be configured before managing resources",
            );
        }
        client
    }
}

#[derive(Debug, Default, Clone)]
pub struct BunnyProvider {
    client: ClientHandle,
}

impl BunnyProvider {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub api_key: ValueString<'a>,
}

#[async_trait]
impl Provider for BunnyProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "api_key" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!(
                            "The bunny.net API key. Can also be set through the environment variable {API_KEY_ENV}"
                        )),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                },
                description: Description::plain("Manage bunny.net CDN resources"),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::Config<'a>) -> Option<()> {
        // the key can still come from the environment
        Some(())
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let Some(api_key) = resolve_api_key(
            config.api_key.as_deref_option(),
            std::env::var(API_KEY_ENV).ok(),
        ) else {
            diags.root_error(
                "credentials not configured",
                format!(
                    "either api_key must be set in the provider config or the environment variable {API_KEY_ENV}"
                ),
            );
            return None;
        };

        let client = match Client::builder(api_key)
            .user_agent(user_agent(&terraform_version))
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                diags.root_error("could not create bunny.net client", err.to_string());
                return None;
            }
        };

        if !self.client.set(client) {
            debug!("provider already configured, keeping the existing client");
        }
        info!(terraform_version, "bunny provider configured");
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        Some(map! {
            "pullzone"     => PullZoneResource::new(self.client.clone()),
            "edgerule"     => EdgeRuleResource::new(self.client.clone()),
            "hostname"     => HostnameResource::new(self.client.clone()),
            "storagezone"  => StorageZoneResource::new(self.client.clone()),
            "videolibrary" => VideoLibraryResource::new(self.client.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(map! {
            "pullzone" => PullZoneDataSource::new(self.client.clone()),
        })
    }
}

fn resolve_api_key(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    configured
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
        .or(from_env.filter(|key| !key.is_empty()))
}

fn user_agent(terraform_version: &str) -> String {
    let base = concat!("terraform-provider-bunny/", env!("CARGO_PKG_VERSION"));
    if terraform_version.is_empty() {
        base.to_owned()
    } else {
        format!("{base} terraform/{terraform_version}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_key_wins_over_environment() {
        assert_eq!(
            resolve_api_key(Some("from-config"), Some("from-env".to_owned())).as_deref(),
            Some("from-config")
        );
        assert_eq!(
            resolve_api_key(None, Some("from-env".to_owned())).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            resolve_api_key(Some(""), Some("from-env".to_owned())).as_deref(),
            Some("from-env")
        );
        assert_eq!(resolve_api_key(None, Some(String::new())), None);
        assert_eq!(resolve_api_key(None, None), None);
    }

    #[test]
    fn user_agent_mentions_terraform_when_known() {
        let version = env!("CARGO_PKG_VERSION");
        assert_eq!(
            user_agent(""),
            format!("terraform-provider-bunny/{version}")
        );
        assert_eq!(
            user_agent("1.9.2"),
            format!("terraform-provider-bunny/{version} terraform/1.9.2")
        );
    }

    #[test]
    fn unconfigured_handle_reports_error() {
        let handle = ClientHandle::default();
        let mut diags = Diagnostics::default();
        assert!(handle.get(&mut diags).is_none());
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].summary, "provider is not configured");
    }

    #[test]
    fn handle_is_shared_between_clones() {
        let handle = ClientHandle::default();
        let resource_handle = handle.clone();
        assert!(handle.set(Client::new("key").unwrap()));
        assert!(!handle.set(Client::new("other").unwrap()));

        let mut diags = Diagnostics::default();
        assert!(resource_handle.get(&mut diags).is_some());
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn registers_every_resource() {
        let provider = BunnyProvider::default();
        let mut diags = Diagnostics::default();
        let mut resources = provider
            .get_resources(&mut diags)
            .unwrap()
            .into_keys()
            .collect::<Vec<_>>();
        resources.sort();
        assert_eq!(
            resources,
            ["edgerule", "hostname", "pullzone", "storagezone", "videolibrary"]
        );
        let data_sources = provider.get_data_sources(&mut diags).unwrap();
        assert!(data_sources.contains_key("pullzone"));
    }

    #[test]
    fn api_key_is_sensitive() {
        let schema = BunnyProvider::default()
            .schema(&mut Diagnostics::default())
            .unwrap();
        let api_key = &schema.block.attributes["api_key"];
        assert!(api_key.sensitive);
        assert_eq!(api_key.constraint, AttributeConstraint::Optional);
    }
}
