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

use std::borrow::Cow;

use async_trait::async_trait;
use bunny_client::PullZone;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueEmpty, ValueNumber, ValueString};
use tf_provider::{map, DataSource, Diagnostics};

use crate::fields::{attribute, sensitive, string_value};
use crate::provider::ClientHandle;
use crate::utils::{no_errors, report};

/// Look up an existing pull zone by id or by name
#[derive(Debug, Default, Clone)]
pub struct PullZoneDataSource {
    client: ClientHandle,
}

impl PullZoneDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PullZoneDataState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub pull_zone_id: ValueNumber,
    pub name: ValueString<'a>,
    pub aws_signing_key: ValueString<'a>,
    pub aws_signing_region_name: ValueString<'a>,
    pub aws_signing_secret: ValueString<'a>,
    pub cname_domain: ValueString<'a>,
    pub storage_zone_id: ValueNumber,
    pub zone_security_enabled: ValueBool,
    pub zone_security_include_hash_remote_ip: ValueBool,
    pub zone_security_key: ValueString<'a>,
}

impl<'a> PullZoneDataState<'a> {
    fn from_pull_zone(pz: &PullZone) -> Self {
        let s = &pz.settings;
        Self {
            id: Value::from(pz.id.map(|id| Cow::Owned(id.to_string()))),
            pull_zone_id: pz.id.into(),
            name: string_value(pz.name.clone()),
            aws_signing_key: string_value(s.aws_signing_key.clone()),
            aws_signing_region_name: string_value(s.aws_signing_region_name.clone()),
            aws_signing_secret: string_value(s.aws_signing_secret.clone()),
            cname_domain: string_value(pz.cname_domain.clone()),
            storage_zone_id: pz.storage_zone_id.into(),
            zone_security_enabled: s.zone_security_enabled.into(),
            zone_security_include_hash_remote_ip: s.zone_security_include_hash_remote_ip.into(),
            zone_security_key: string_value(s.zone_security_key.clone()),
        }
    }
}

#[async_trait]
impl DataSource for PullZoneDataSource {
    type State<'a> = PullZoneDataState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        use AttributeConstraint::{Computed, OptionalComputed};
        use AttributeType::{Bool, Number};
        Some(Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "Numeric id of the pull zone"),
                    "pull_zone_id" => attribute(Number, OptionalComputed, "Id of the pull zone to look up, conflicts with name"),
                    "name" => attribute(AttributeType::String, OptionalComputed, "Name of the pull zone to look up, conflicts with pull_zone_id"),
                    "aws_signing_key" => attribute(AttributeType::String, Computed, "AWS signing key"),
                    "aws_signing_region_name" => attribute(AttributeType::String, Computed, "AWS signing region"),
                    "aws_signing_secret" => sensitive(attribute(AttributeType::String, Computed, "AWS signing secret")),
                    "cname_domain" => attribute(AttributeType::String, Computed, "CNAME hostnames should point to"),
                    "storage_zone_id" => attribute(Number, Computed, "Storage zone used as origin"),
                    "zone_security_enabled" => attribute(Bool, Computed, "Whether token authentication is required"),
                    "zone_security_include_hash_remote_ip" => attribute(Bool, Computed, "Whether the client address is part of the authentication hash"),
                    "zone_security_key" => sensitive(attribute(AttributeType::String, Computed, "Token authentication key")),
                },
                description: Description::plain("Existing bunny.net pull zone"),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        let given = config.pull_zone_id.is_value() as u8 + config.name.is_value() as u8;
        let unknown = config.pull_zone_id.is_unknown() as u8 + config.name.is_unknown() as u8;
        if given > 1 || given + unknown == 0 {
            diags.root_error(
                "invalid pull zone lookup",
                "exactly one of \"pull_zone_id\" or \"name\" must be set",
            );
        }
        no_errors(diags)
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.client.get(diags)?;

        if let Value::Value(id) = config.pull_zone_id {
            return match client.pull_zone_get(id).await {
                Ok(pz) => Some(PullZoneDataState::from_pull_zone(&pz)),
                Err(err) => {
                    report(diags, "could not retrieve pull zone", &err);
                    None
                }
            };
        }

        let name = config.name.as_deref_option().unwrap_or_default();
        let zones = match client.pull_zone_list_all().await {
            Ok(zones) => zones,
            Err(err) => {
                report(diags, "could not list pull zones", &err);
                return None;
            }
        };
        debug!(count = zones.len(), name, "searching pull zone by name");

        match find_by_name(&zones, name) {
            Some(pz) => Some(PullZoneDataState::from_pull_zone(pz)),
            None => {
                diags.root_error(
                    "pull zone not found",
                    format!("no pull zone is named {name:?}"),
                );
                None
            }
        }
    }
}

fn find_by_name<'z>(zones: &'z [PullZone], name: &str) -> Option<&'z PullZone> {
    zones
        .iter()
        .find(|pz| pz.name.as_deref() == Some(name))
}
