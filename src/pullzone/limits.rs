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

use bunny_client::PullZoneSettings;
use serde::{Deserialize, Serialize};

use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description};
use tf_provider::value::ValueNumber;
use tf_provider::{map, AttributePath, Diagnostics};

use crate::fields::{attribute, default_to, known, known_i32, validate_int32};
use crate::utils::WithValidate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Limits {
    pub connection_limit_per_ip_count: ValueNumber,
    pub request_limit: ValueNumber,
    pub monthly_bandwidth_limit: ValueNumber,
}

impl Limits {
    pub(super) fn block() -> Block {
        use AttributeConstraint::OptionalComputed;
        use AttributeType::Number;
        Block {
            attributes: map! {
                "connection_limit_per_ip_count" => attribute(Number, OptionalComputed, "Maximum number of connections per IP, 0 for unlimited"),
                "request_limit" => attribute(Number, OptionalComputed, "Maximum number of requests per second per IP, 0 for unlimited"),
                "monthly_bandwidth_limit" => attribute(Number, OptionalComputed, "Monthly bandwidth limit in bytes, 0 for unlimited"),
            },
            description: Description::plain("Rate and bandwidth limits"),
            ..Default::default()
        }
    }

    pub(super) fn apply_defaults(&mut self, config: &Self) {
        default_to(
            &mut self.connection_limit_per_ip_count,
            &config.connection_limit_per_ip_count,
            0,
        );
        default_to(&mut self.request_limit, &config.request_limit, 0);
        default_to(&mut self.monthly_bandwidth_limit, &config.monthly_bandwidth_limit, 0);
    }

    pub(super) fn expand(&self, settings: &mut PullZoneSettings) {
        settings.connection_limit_per_ip_count = known_i32(&self.connection_limit_per_ip_count);
        settings.request_limit = known_i32(&self.request_limit);
        settings.monthly_bandwidth_limit = known(&self.monthly_bandwidth_limit);
    }

    pub(super) fn flatten(settings: &PullZoneSettings) -> Self {
        Self {
            connection_limit_per_ip_count: settings
                .connection_limit_per_ip_count
                .map(i64::from)
                .into(),
            request_limit: settings.request_limit.map(i64::from).into(),
            monthly_bandwidth_limit: settings.monthly_bandwidth_limit.into(),
        }
    }
}

impl WithValidate for Limits {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        validate_int32(
            diags,
            &self.connection_limit_per_ip_count,
            attr_path.clone().attribute("connection_limit_per_ip_count"),
        );
        validate_int32(diags, &self.request_limit, attr_path.attribute("request_limit"));
    }
}
