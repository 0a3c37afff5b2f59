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
use tf_provider::value::{Value, ValueBool, ValueNumber};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::fields::{attribute, default_to, known, known_i32, validate_one_of};
use crate::utils::WithValidate;

const CONNECT_TIMEOUTS: &[i64] = &[3, 5, 10];
const RESPONSE_TIMEOUTS: &[i64] = &[5, 15, 30, 45, 60];
const RETRIES: &[i64] = &[0, 1, 2];
const RETRY_DELAYS: &[i64] = &[0, 1, 3, 5, 10];

/// Origin retry policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SafeHop {
    pub enable: ValueBool,
    pub origin_connect_timeout: ValueNumber,
    pub origin_response_timeout: ValueNumber,
    pub origin_retries: ValueNumber,
    pub origin_retry_5xx_response: ValueBool,
    pub origin_retry_connection_timeout: ValueBool,
    pub origin_retry_delay: ValueNumber,
    pub origin_retry_response_timeout: ValueBool,
}

impl SafeHop {
    pub(super) fn block() -> Block {
        use AttributeConstraint::OptionalComputed;
        use AttributeType::{Bool, Number};
        Block {
            attributes: map! {
                "enable" => attribute(Bool, OptionalComputed, "Enable retrying failed origin requests"),
                "origin_connect_timeout" => attribute(Number, OptionalComputed, "Seconds to wait for the origin connection: 3, 5 or 10"),
                "origin_response_timeout" => attribute(Number, OptionalComputed, "Seconds to wait for the origin response: 5, 15, 30, 45 or 60"),
                "origin_retries" => attribute(Number, OptionalComputed, "Number of retries: 0, 1 or 2"),
                "origin_retry_5xx_response" => attribute(Bool, OptionalComputed, "Retry when the origin answers with a 5xx status"),
                "origin_retry_connection_timeout" => attribute(Bool, OptionalComputed, "Retry when the origin connection times out"),
                "origin_retry_delay" => attribute(Number, OptionalComputed, "Seconds between two retries: 0, 1, 3, 5 or 10"),
                "origin_retry_response_timeout" => attribute(Bool, OptionalComputed, "Retry when the origin response times out"),
            },
            description: Description::plain("Origin retry policy (SafeHop)"),
            ..Default::default()
        }
    }

    pub(super) fn apply_defaults(&mut self, config: &Self) {
        default_to(&mut self.enable, &config.enable, false);
        default_to(&mut self.origin_connect_timeout, &config.origin_connect_timeout, 10);
        default_to(&mut self.origin_response_timeout, &config.origin_response_timeout, 60);
        default_to(&mut self.origin_retries, &config.origin_retries, 0);
        default_to(&mut self.origin_retry_5xx_response, &config.origin_retry_5xx_response, false);
        default_to(
            &mut self.origin_retry_connection_timeout,
            &config.origin_retry_connection_timeout,
            true,
        );
        default_to(&mut self.origin_retry_delay, &config.origin_retry_delay, 0);
        default_to(
            &mut self.origin_retry_response_timeout,
            &config.origin_retry_response_timeout,
            true,
        );
    }

    pub(super) fn expand(&self, settings: &mut PullZoneSettings) {
        settings.enable_safe_hop = known(&self.enable);
        settings.origin_connect_timeout = known_i32(&self.origin_connect_timeout);
        settings.origin_response_timeout = known_i32(&self.origin_response_timeout);
        settings.origin_retries = known_i32(&self.origin_retries);
        settings.origin_retry_5xx_responses = known(&self.origin_retry_5xx_response);
        settings.origin_retry_connection_timeout = known(&self.origin_retry_connection_timeout);
        settings.origin_retry_delay = known_i32(&self.origin_retry_delay);
        settings.origin_retry_response_timeout = known(&self.origin_retry_response_timeout);
    }

    pub(super) fn flatten(settings: &PullZoneSettings, prior: &Self) -> Self {
        Self {
            enable: settings.enable_safe_hop.into(),
            origin_connect_timeout: nonzero_or_prior(
                settings.origin_connect_timeout,
                &prior.origin_connect_timeout,
            ),
            origin_response_timeout: nonzero_or_prior(
                settings.origin_response_timeout,
                &prior.origin_response_timeout,
            ),
            origin_retries: nonzero_or_prior(settings.origin_retries, &prior.origin_retries),
            origin_retry_5xx_response: settings.origin_retry_5xx_responses.into(),
            origin_retry_connection_timeout: settings.origin_retry_connection_timeout.into(),
            origin_retry_delay: nonzero_or_prior(
                settings.origin_retry_delay,
                &prior.origin_retry_delay,
            ),
            origin_retry_response_timeout: settings.origin_retry_response_timeout.into(),
        }
    }
}

impl WithValidate for SafeHop {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        validate_one_of(
            diags,
            &self.origin_connect_timeout,
            CONNECT_TIMEOUTS,
            attr_path.clone().attribute("origin_connect_timeout"),
        );
        validate_one_of(
            diags,
            &self.origin_response_timeout,
            RESPONSE_TIMEOUTS,
            attr_path.clone().attribute("origin_response_timeout"),
        );
        validate_one_of(
            diags,
            &self.origin_retries,
            RETRIES,
            attr_path.clone().attribute("origin_retries"),
        );
        validate_one_of(
            diags,
            &self.origin_retry_delay,
            RETRY_DELAYS,
            attr_path.attribute("origin_retry_delay"),
        );
    }
}

/// The API answers 0 for timings it did not store, the configured value is kept then
fn nonzero_or_prior(remote: Option<i32>, prior: &ValueNumber) -> ValueNumber {
    match (remote, prior) {
        (Some(value), _) if value != 0 => Value::Value(value.into()),
        (_, Value::Value(prior)) => Value::Value(*prior),
        (remote, _) => remote.map(i64::from).into(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn configured() -> SafeHop {
        SafeHop {
            enable: Value::Value(true),
            origin_connect_timeout: Value::Value(5),
            origin_response_timeout: Value::Value(30),
            origin_retries: Value::Value(2),
            origin_retry_5xx_response: Value::Value(true),
            origin_retry_connection_timeout: Value::Value(false),
            origin_retry_delay: Value::Value(3),
            origin_retry_response_timeout: Value::Value(false),
        }
    }

    #[test]
    fn expand_then_flatten_keeps_values() {
        let mut settings = PullZoneSettings::default();
        configured().expand(&mut settings);
        assert_eq!(settings.origin_connect_timeout, Some(5));
        assert_eq!(settings.origin_retry_5xx_responses, Some(true));
        assert_eq!(SafeHop::flatten(&settings, &SafeHop::default()), configured());
    }

    #[test]
    fn zero_timings_keep_prior_value() {
        let settings = PullZoneSettings {
            enable_safe_hop: Some(true),
            origin_connect_timeout: Some(0),
            origin_retry_delay: Some(0),
            ..Default::default()
        };
        let flat = SafeHop::flatten(&settings, &configured());
        assert_eq!(flat.origin_connect_timeout, Value::Value(5));
        assert_eq!(flat.origin_retry_delay, Value::Value(3));

        let imported = SafeHop::flatten(&settings, &SafeHop::default());
        assert_eq!(imported.origin_connect_timeout, Value::Value(0));
        assert_eq!(imported.origin_retries, Value::Null);
    }

    #[test]
    fn defaults_fill_unset_attributes() {
        let mut planned = SafeHop::default();
        planned.apply_defaults(&SafeHop::default());
        assert_eq!(planned.origin_connect_timeout, Value::Value(10));
        assert_eq!(planned.origin_response_timeout, Value::Value(60));
        assert_eq!(planned.origin_retry_connection_timeout, Value::Value(true));
        assert_eq!(planned.enable, Value::Value(false));
    }

    #[test]
    fn timings_are_restricted() {
        let mut diags = Diagnostics::default();
        configured().validate(&mut diags, AttributePath::new("safehop").index(0));
        assert!(diags.errors.is_empty());

        let invalid = SafeHop {
            origin_connect_timeout: Value::Value(4),
            origin_retries: Value::Value(3),
            ..configured()
        };
        invalid.validate(&mut diags, AttributePath::new("safehop").index(0));
        assert_eq!(diags.errors.len(), 2);
        assert_eq!(
            diags.errors[0].attribute,
            AttributePath::new("safehop")
                .index(0)
                .attribute("origin_connect_timeout")
        );
    }
}
