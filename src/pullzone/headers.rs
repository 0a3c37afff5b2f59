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

use bunny_client::PullZoneSettings;
use serde::{Deserialize, Serialize};

use tf_provider::map;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description};
use tf_provider::value::{Value, ValueBool, ValueString};

use crate::fields::{attribute, default_str, default_to, known};
use crate::sets::normalize_str_list;

const DEFAULT_EXTENSIONS: &str = "eot, ttf, woff, woff2, css";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Headers<'a> {
    pub enable_access_control_origin_header: ValueBool,
    #[serde(borrow = "'a")]
    pub access_control_origin_header_extensions: ValueString<'a>,
    pub add_canonical_header: ValueBool,
    pub add_host_header: ValueBool,
}

impl<'a> Headers<'a> {
    pub(super) fn block() -> Block {
        use AttributeConstraint::OptionalComputed;
        use AttributeType::Bool;
        Block {
            attributes: map! {
                "enable_access_control_origin_header" => attribute(Bool, OptionalComputed, "Add the CORS header to responses"),
                "access_control_origin_header_extensions" => attribute(AttributeType::String, OptionalComputed, "Comma separated file extensions the CORS header is added for"),
                "add_canonical_header" => attribute(Bool, OptionalComputed, "Add a canonical Link header to responses"),
                "add_host_header" => attribute(Bool, OptionalComputed, "Forward the Host header to the origin"),
            },
            description: Description::plain("Response and origin headers"),
            ..Default::default()
        }
    }

    pub(super) fn apply_defaults(&mut self, config: &Self) {
        default_to(
            &mut self.enable_access_control_origin_header,
            &config.enable_access_control_origin_header,
            true,
        );
        default_str(
            &mut self.access_control_origin_header_extensions,
            &config.access_control_origin_header_extensions,
            DEFAULT_EXTENSIONS,
        );
        default_to(&mut self.add_canonical_header, &config.add_canonical_header, false);
        default_to(&mut self.add_host_header, &config.add_host_header, false);
    }

    pub(super) fn expand(&self, settings: &mut PullZoneSettings) {
        settings.enable_access_control_origin_header =
            known(&self.enable_access_control_origin_header);
        settings.access_control_origin_header_extensions = self
            .access_control_origin_header_extensions
            .as_deref_option()
            .map(normalize_str_list);
        settings.add_canonical_header = known(&self.add_canonical_header);
        settings.add_host_header = known(&self.add_host_header);
    }

    pub(super) fn flatten(settings: &PullZoneSettings, prior: &Self) -> Self {
        Self {
            enable_access_control_origin_header: settings
                .enable_access_control_origin_header
                .into(),
            access_control_origin_header_extensions: flatten_extensions(
                settings.access_control_origin_header_extensions.as_deref(),
                &prior.access_control_origin_header_extensions,
            ),
            add_canonical_header: settings.add_canonical_header.into(),
            add_host_header: settings.add_host_header.into(),
        }
    }
}

/// The configured list is kept when it holds the same extensions
fn flatten_extensions<'a>(remote: Option<&[String]>, prior: &ValueString<'a>) -> ValueString<'a> {
    let Some(remote) = remote else {
        return Value::Null;
    };
    let mut sorted = remote.to_vec();
    sorted.sort();
    if let Value::Value(prior_list) = prior {
        if normalize_str_list(prior_list) == sorted {
            return prior.clone();
        }
    }
    Value::Value(Cow::Owned(remote.join(", ")))
}
