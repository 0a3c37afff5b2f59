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

//! Edge rules of a pull zone
//!
//! The API does not return the GUID of a new edge rule. A unique token is written in the
//! description on creation, and the rule carrying it is then searched in the pull zone.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::str::FromStr;

use async_trait::async_trait;
use bunny_client::{
    AddOrUpdateEdgeRuleOptions, EdgeRule, EdgeRuleActionType, EdgeRuleTrigger,
    EdgeRuleTriggerType, MatchingType, PullZone, UnknownName, MAX_EDGE_RULE_TRIGGERS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use tf_provider::schema::{
    AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};
use tf_provider::value::{Value, ValueBool, ValueEmpty, ValueNumber, ValueSet, ValueString};
use tf_provider::{map, AttributePath, Diagnostics, Resource};

use crate::fields::{
    attribute, default_str, default_to, from_remote_str, keep_prior, known, known_str,
    required_number, set_strings, string_set, string_value, value_set,
};
use crate::provider::ClientHandle;
use crate::utils::{no_errors, report};

pub const EDGE_RULE_ID_PREFIX: &str = "terraform-provider-bunny id: ";

#[derive(Debug, Default, Clone)]
pub struct EdgeRuleResource {
    client: ClientHandle,
}

impl EdgeRuleResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EdgeRuleState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub pull_zone_id: ValueNumber,
    pub action_type: ValueString<'a>,
    pub action_parameter_1: ValueString<'a>,
    pub action_parameter_2: ValueString<'a>,
    pub trigger: ValueSet<Trigger<'a>>,
    pub trigger_matching_type: ValueString<'a>,
    pub description: ValueString<'a>,
    pub enabled: ValueBool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Trigger<'a> {
    #[serde(rename = "type", borrow = "'a")]
    pub trigger_type: ValueString<'a>,
    pub pattern_matches: ValueSet<ValueString<'a>>,
    pub pattern_matching_type: ValueString<'a>,
    pub parameter_1: ValueString<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuidLookupError {
    #[error("pull zone has no edge rule with internal identifier in description")]
    NotFound,
    #[error("found edge rule with matching description but guid is empty")]
    EmptyGuid,
}

/// GUID of the edge rule whose description is `token`
pub fn find_edge_rule_guid(pz: &PullZone, token: &str) -> Result<String, GuidLookupError> {
    let rule = pz
        .edge_rules
        .iter()
        .find(|rule| rule.description.as_deref() == Some(token))
        .ok_or(GuidLookupError::NotFound)?;
    match rule.guid.as_deref() {
        Some(guid) if !guid.is_empty() => Ok(guid.to_owned()),
        _ => Err(GuidLookupError::EmptyGuid),
    }
}

fn schema() -> Schema {
    use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};
    let string = || AttributeType::String;
    let accepted = |names: Vec<&str>| names.join(", ");

    Schema {
        version: 1,
        block: Block {
            attributes: map! {
                "id" => attribute(string(), Computed, "GUID of the edge rule"),
                "pull_zone_id" => attribute(AttributeType::Number, Required, "Pull zone the edge rule belongs to"),
                "action_type" => attribute(string(), Required, &format!("Action of the edge rule, one of: {}", accepted(EdgeRuleActionType::names()))),
                "action_parameter_1" => attribute(string(), Optional, "First action parameter, its meaning depends on the action"),
                "action_parameter_2" => attribute(string(), Optional, "Second action parameter, its meaning depends on the action"),
                "trigger_matching_type" => attribute(string(), OptionalComputed, &format!("How triggers are combined, one of: {}", accepted(MatchingType::names()))),
                "description" => attribute(string(), Computed, "Description of the edge rule, used internally by the provider"),
                "enabled" => attribute(AttributeType::Bool, OptionalComputed, "Whether the edge rule is enabled"),
            },
            blocks: map! {
                "trigger" => NestedBlock::Set(Block {
                    attributes: map! {
                        "type" => attribute(string(), Required, &format!("Type of the trigger, one of: {}", accepted(EdgeRuleTriggerType::names()))),
                        "pattern_matches" => attribute(string_set(), Optional, "Patterns the trigger matches"),
                        "pattern_matching_type" => attribute(string(), Required, &format!("How patterns are combined, one of: {}", accepted(MatchingType::names()))),
                        "parameter_1" => attribute(string(), Optional, "Trigger parameter, its meaning depends on the trigger type"),
                    },
                    description: Description::plain(format!(
                        "Conditions selecting the requests, 1 to {MAX_EDGE_RULE_TRIGGERS}"
                    )),
                    ..Default::default()
                }),
            },
            description: Description::plain("Edge rule of a bunny.net pull zone"),
            ..Default::default()
        },
    }
}

/// Check that `value` is one of the names of `T`
fn validate_name<T>(diags: &mut Diagnostics, value: &ValueString, path: AttributePath)
where
    T: FromStr<Err = UnknownName>,
{
    if let Value::Value(name) = value {
        if let Err(err) = name.parse::<T>() {
            diags.error(format!("invalid value {name:?}"), err.to_string(), path);
        }
    }
}

fn parse_known<T: FromStr>(value: &ValueString) -> Option<T> {
    value.as_deref_option().and_then(|name| name.parse().ok())
}

impl<'a> EdgeRuleState<'a> {
    fn validate(&self, diags: &mut Diagnostics) {
        validate_name::<EdgeRuleActionType>(diags, &self.action_type, AttributePath::new("action_type"));
        validate_name::<MatchingType>(
            diags,
            &self.trigger_matching_type,
            AttributePath::new("trigger_matching_type"),
        );

        match &self.trigger {
            Value::Value(triggers) => {
                if triggers.is_empty() || triggers.len() > MAX_EDGE_RULE_TRIGGERS {
                    diags.error(
                        "invalid number of triggers",
                        format!(
                            "an edge rule needs between 1 and {MAX_EDGE_RULE_TRIGGERS} triggers, got {}",
                            triggers.len()
                        ),
                        AttributePath::new("trigger"),
                    );
                }
                for trigger in triggers {
                    let path = AttributePath::new("trigger");
                    validate_name::<EdgeRuleTriggerType>(
                        diags,
                        &trigger.trigger_type,
                        path.clone().attribute("type"),
                    );
                    validate_name::<MatchingType>(
                        diags,
                        &trigger.pattern_matching_type,
                        path.attribute("pattern_matching_type"),
                    );
                }
            }
            Value::Null => diags.error_short(
                "an edge rule needs at least one trigger",
                AttributePath::new("trigger"),
            ),
            Value::Unknown => (),
        }
    }

    fn apply_defaults(&mut self, config: &Self) {
        default_to(&mut self.enabled, &config.enabled, true);
        default_str(
            &mut self.trigger_matching_type,
            &config.trigger_matching_type,
            MatchingType::Any.as_str(),
        );
    }

    /// Request creating the rule, or updating it when `guid` is given
    fn to_options(&self, guid: Option<String>, description: Option<String>) -> AddOrUpdateEdgeRuleOptions {
        let triggers = self
            .trigger
            .iter()
            .flatten()
            .map(|trigger| EdgeRuleTrigger {
                trigger_type: parse_known(&trigger.trigger_type),
                pattern_matches: set_strings(&trigger.pattern_matches),
                pattern_matching_type: parse_known(&trigger.pattern_matching_type),
                parameter_1: known_str(&trigger.parameter_1),
            })
            .collect();

        EdgeRule {
            guid,
            action_type: parse_known(&self.action_type),
            action_parameter_1: known_str(&self.action_parameter_1),
            action_parameter_2: known_str(&self.action_parameter_2),
            triggers,
            trigger_matching_type: parse_known(&self.trigger_matching_type),
            description,
            enabled: known(&self.enabled),
        }
    }

    fn from_rule(rule: &EdgeRule, prior: &Self) -> Self {
        let name = |name: Option<&'static str>| Value::from(name.map(Cow::Borrowed));
        let triggers = rule
            .triggers
            .iter()
            .map(|trigger| Trigger {
                trigger_type: name(trigger.trigger_type.map(|t| t.as_str())),
                pattern_matches: if trigger.pattern_matches.is_empty() {
                    Value::Null
                } else {
                    value_set(trigger.pattern_matches.iter().cloned())
                },
                pattern_matching_type: name(trigger.pattern_matching_type.map(|t| t.as_str())),
                parameter_1: string_value(
                    trigger.parameter_1.clone().filter(|param| !param.is_empty()),
                ),
            })
            .collect::<BTreeSet<_>>();

        Self {
            id: string_value(rule.guid.clone()),
            pull_zone_id: prior.pull_zone_id.clone(),
            action_type: name(rule.action_type.map(|t| t.as_str())),
            action_parameter_1: from_remote_str(
                &prior.action_parameter_1,
                rule.action_parameter_1.clone(),
            ),
            action_parameter_2: from_remote_str(
                &prior.action_parameter_2,
                rule.action_parameter_2.clone(),
            ),
            trigger: Value::Value(triggers),
            trigger_matching_type: name(rule.trigger_matching_type.map(|t| t.as_str())),
            description: string_value(rule.description.clone()),
            enabled: rule.enabled.into(),
        }
    }
}

#[async_trait]
impl Resource for EdgeRuleResource {
    type State<'a> = EdgeRuleState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags);
        no_errors(diags)
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let pull_zone_id = required_number(diags, &state.pull_zone_id, "pull_zone_id")?;
        let guid = state.id.as_str();

        let pz = match client.pull_zone_get(pull_zone_id).await {
            Ok(pz) => pz,
            Err(err) => {
                report(diags, "retrieving pull zone failed", &err);
                return None;
            }
        };
        if pz.edge_rules.is_empty() {
            diags.root_error_short("pull zone has no edge rules");
            return None;
        }
        let Some(rule) = pz
            .edge_rules
            .iter()
            .find(|rule| rule.guid.as_deref() == Some(guid))
        else {
            diags.root_error(
                "edge rule not found",
                format!("pull zone with id {pull_zone_id}, has no edge rule with guid: {guid:?}"),
            );
            return None;
        };

        Some((EdgeRuleState::from_rule(rule, &state), private_state))
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.apply_defaults(&config_state);
        state.id = Value::Unknown;
        state.description = Value::Unknown;
        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<AttributePath>,
    )> {
        let mut state = proposed_state;
        state.apply_defaults(&config_state);
        keep_prior(&mut state.id, &prior_state.id);
        keep_prior(&mut state.description, &prior_state.description);

        let mut replace = vec![];
        if state.pull_zone_id != prior_state.pull_zone_id {
            replace.push(AttributePath::new("pull_zone_id"));
        }
        Some((state, prior_private_state, replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        _prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(Default::default())
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let pull_zone_id = required_number(diags, &planned_state.pull_zone_id, "pull_zone_id")?;

        let token = format!("{EDGE_RULE_ID_PREFIX}{}", Uuid::new_v4());
        let options = planned_state.to_options(None, Some(token.clone()));
        if let Err(err) = client.edge_rule_add_or_update(pull_zone_id, &options).await {
            report(diags, "creating edge rule failed", &err);
            return None;
        }

        let pz = match client.pull_zone_get(pull_zone_id).await {
            Ok(pz) => pz,
            Err(err) => {
                report(diags, "retrieving pull zone failed", &err);
                return None;
            }
        };
        let guid = match find_edge_rule_guid(&pz, &token) {
            Ok(guid) => guid,
            Err(err) => {
                warn!(pull_zone_id, token = %token, "edge rule created but not found");
                diags.root_error(
                    "looking up the guid of the created edge rule failed",
                    format!("edge rule (description: {token:?}) created successfully: {err}"),
                );
                return None;
            }
        };
        info!(pull_zone_id, guid = %guid, "edge rule created");

        let mut state = planned_state;
        state.id = Value::Value(guid.into());
        state.description = Value::Value(token.into());
        Some((state, planned_private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let pull_zone_id = required_number(diags, &planned_state.pull_zone_id, "pull_zone_id")?;

        let options = planned_state.to_options(
            known_str(&prior_state.id),
            known_str(&prior_state.description),
        );
        if let Err(err) = client.edge_rule_add_or_update(pull_zone_id, &options).await {
            report(diags, "updating edge rule failed", &err);
            return None;
        }
        info!(pull_zone_id, guid = prior_state.id.as_str(), "edge rule updated");

        Some((planned_state, planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.get(diags)?;
        let pull_zone_id = required_number(diags, &prior_state.pull_zone_id, "pull_zone_id")?;
        let guid = prior_state.id.as_str();

        match client.edge_rule_delete(pull_zone_id, guid).await {
            Ok(()) => {
                info!(pull_zone_id, guid, "edge rule deleted");
                Some(())
            }
            Err(err) => {
                report(diags, "deleting edge rule failed", &err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rule(guid: &str, description: &str) -> EdgeRule {
        EdgeRule {
            guid: Some(guid.to_owned()),
            action_type: Some(EdgeRuleActionType::BlockRequest),
            description: Some(description.to_owned()),
            ..Default::default()
        }
    }

    fn trigger(trigger_type: &'static str, patterns: &[&str]) -> Trigger<'static> {
        Trigger {
            trigger_type: Value::Value(trigger_type.into()),
            pattern_matches: value_set(patterns.iter().map(|p| p.to_string())),
            pattern_matching_type: Value::Value("any".into()),
            parameter_1: Value::Null,
        }
    }

    fn state() -> EdgeRuleState<'static> {
        EdgeRuleState {
            id: Value::Value("guid-1".into()),
            pull_zone_id: Value::Value(42),
            action_type: Value::Value("set_response_header".into()),
            action_parameter_1: Value::Value("X-Frame-Options".into()),
            action_parameter_2: Value::Value("DENY".into()),
            trigger: Value::Value(
                [trigger("url", &["*/admin/*", "*/login"]), trigger("country_code", &["DE"])]
                    .into_iter()
                    .collect(),
            ),
            trigger_matching_type: Value::Value("all".into()),
            description: Value::Value(format!("{EDGE_RULE_ID_PREFIX}x").into()),
            enabled: Value::Value(true),
        }
    }

    #[test]
    fn guid_is_found_by_token() {
        let pz = PullZone {
            edge_rules: vec![
                rule("a", "terraform-provider-bunny id: 1"),
                rule("b", "terraform-provider-bunny id: 2"),
                rule("c", "terraform-provider-bunny id: 3"),
            ],
            ..Default::default()
        };
        assert_eq!(
            find_edge_rule_guid(&pz, "terraform-provider-bunny id: 2"),
            Ok("b".to_owned())
        );
        assert_eq!(
            find_edge_rule_guid(&pz, "terraform-provider-bunny id: 4"),
            Err(GuidLookupError::NotFound)
        );
    }

    #[test]
    fn matching_rule_without_guid_is_an_error() {
        let pz = PullZone {
            edge_rules: vec![rule("", "token")],
            ..Default::default()
        };
        assert_eq!(find_edge_rule_guid(&pz, "token"), Err(GuidLookupError::EmptyGuid));
    }

    #[test]
    fn request_round_trips_through_state() {
        let state = state();
        let options = state.to_options(known_str(&state.id), known_str(&state.description));
        assert_eq!(options.action_type, Some(EdgeRuleActionType::SetResponseHeader));
        assert_eq!(options.trigger_matching_type, Some(MatchingType::All));
        assert_eq!(options.triggers.len(), 2);

        let read = EdgeRuleState::from_rule(&options, &state);
        assert_eq!(read, state);
    }

    #[test]
    fn too_many_triggers_are_rejected() {
        let mut config = state();
        config.trigger = Value::Value(
            (0..6)
                .map(|i| Trigger {
                    parameter_1: Value::Value(i.to_string().into()),
                    ..trigger("url", &["*"])
                })
                .collect(),
        );
        let mut diags = Diagnostics::default();
        config.validate(&mut diags);
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].attribute, AttributePath::new("trigger"));
    }

    #[test]
    fn unknown_names_list_accepted_values() {
        let mut config = state();
        config.action_type = Value::Value("ignore_quiery_string".into());
        let mut diags = Diagnostics::default();
        config.validate(&mut diags);
        assert_eq!(diags.errors.len(), 1);
        assert!(diags.errors[0].detail.contains("ignore_query_string"));
    }

    #[test]
    fn defaults() {
        let config = EdgeRuleState::default();
        let mut planned = config.clone();
        planned.apply_defaults(&config);
        assert_eq!(planned.enabled, Value::Value(true));
        assert_eq!(planned.trigger_matching_type.as_str(), "any");
    }
}
