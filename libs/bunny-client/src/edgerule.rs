//! Edge rule endpoints and their closed enumerations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};

/// Declare an enum transported as an integer and configured by name
///
/// Wire values not listed are decode errors.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident = $value:literal => $str:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Name used in configurations
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $str,)+
                }
            }

            /// Value used on the wire
            pub fn value(&self) -> i64 {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Every configuration name, in declaration order
            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(Self::as_str).collect()
            }
        }

        impl TryFrom<i64> for $name {
            type Error = Error;

            fn try_from(value: i64) -> Result<Self> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(Error::UnknownEnumValue { kind: $kind, value }),
                }
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> i64 {
                value.value()
            }
        }

        impl FromStr for $name {
            type Err = UnknownName;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($str => Ok($name::$variant),)+
                    _ => Err(UnknownName {
                        kind: $kind,
                        name: s.to_owned(),
                        accepted: Self::names(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Name that is not part of a closed enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {kind} {name:?}, expected one of: {}", .accepted.join(", "))]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
    pub accepted: Vec<&'static str>,
}

wire_enum! {
    /// How triggers or patterns are combined
    MatchingType("matching type") {
        Any = 0 => "any",
        All = 1 => "all",
        None = 2 => "none",
    }
}

wire_enum! {
    EdgeRuleActionType("action type") {
        ForceSsl = 0 => "force_ssl",
        Redirect = 1 => "redirect",
        OriginUrl = 2 => "origin_url",
        OverrideCacheTime = 3 => "override_cache_time",
        BlockRequest = 4 => "block_request",
        SetResponseHeader = 5 => "set_response_header",
        SetRequestHeader = 6 => "set_request_header",
        ForceDownload = 7 => "force_download",
        DisableTokenAuthentication = 8 => "disable_token_auth",
        EnableTokenAuthentication = 9 => "enable_token_auth",
        OverrideCacheTimePublic = 10 => "override_cache_time_public",
        IgnoreQueryString = 11 => "ignore_query_string",
        DisableOptimizer = 12 => "disable_optimizer",
        ForceCompression = 13 => "force_compression",
        SetStatusCode = 14 => "set_status_code",
        BypassPermaCache = 15 => "bypass_perma_cache",
    }
}

wire_enum! {
    EdgeRuleTriggerType("trigger type") {
        Url = 0 => "url",
        RequestHeader = 1 => "request_header",
        ResponseHeader = 2 => "response_header",
        UrlExtension = 3 => "url_extensions",
        CountryCode = 4 => "country_code",
        RemoteIp = 5 => "remote_ip",
        UrlQueryString = 6 => "query_string",
        RandomChance = 7 => "random_chance",
    }
}

/// Maximum number of triggers the API accepts on one rule
pub const MAX_EDGE_RULE_TRIGGERS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct EdgeRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<EdgeRuleActionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_parameter_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_parameter_2: Option<String>,
    pub triggers: Vec<EdgeRuleTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_matching_type: Option<MatchingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct EdgeRuleTrigger {
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<EdgeRuleTriggerType>,
    pub pattern_matches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_matching_type: Option<MatchingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_1: Option<String>,
}

/// Body of the add-or-update endpoint; a missing guid creates a new rule
pub type AddOrUpdateEdgeRuleOptions = EdgeRule;

impl Client {
    /// Create or update an edge rule
    ///
    /// The API does not return the rule, a new rule has to be looked up on its pull zone.
    pub async fn edge_rule_add_or_update(
        &self,
        pull_zone_id: i64,
        options: &AddOrUpdateEdgeRuleOptions,
    ) -> Result<()> {
        let url = self.url(&format!("pullzone/{pull_zone_id}/edgerules/addOrUpdate"))?;
        self.post_no_content(url, options).await
    }

    pub async fn edge_rule_delete(&self, pull_zone_id: i64, guid: &str) -> Result<()> {
        let url = self.url(&format!("pullzone/{pull_zone_id}/edgerules/{guid}"))?;
        self.delete::<()>(url, None).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn names_round_trip() {
        for action in EdgeRuleActionType::ALL {
            assert_eq!(action.as_str().parse::<EdgeRuleActionType>(), Ok(*action));
        }
        for trigger in EdgeRuleTriggerType::ALL {
            assert_eq!(trigger.as_str().parse::<EdgeRuleTriggerType>(), Ok(*trigger));
        }
        for matching in MatchingType::ALL {
            assert_eq!(matching.as_str().parse::<MatchingType>(), Ok(*matching));
        }
    }

    #[test]
    fn wire_values_are_contiguous() {
        for (i, action) in EdgeRuleActionType::ALL.iter().enumerate() {
            assert_eq!(action.value(), i as i64);
        }
        assert_eq!(EdgeRuleActionType::IgnoreQueryString.value(), 11);
        assert_eq!(EdgeRuleTriggerType::RandomChance.value(), 7);
    }

    #[test]
    fn misspelled_name_is_rejected() {
        let err = "ignore_quiery_string"
            .parse::<EdgeRuleActionType>()
            .unwrap_err();
        assert_eq!(err.kind, "action type");
        assert!(err.to_string().contains("ignore_query_string"));
    }

    #[test]
    fn unknown_wire_value_fails_decoding() {
        let decoded = serde_json::from_str::<EdgeRule>(r#"{"Guid":"g","ActionType":99}"#);
        assert!(decoded.is_err());

        assert!(matches!(
            EdgeRuleTriggerType::try_from(99),
            Err(Error::UnknownEnumValue { kind: "trigger type", value: 99 })
        ));
    }

    #[test]
    fn rule_encodes_enums_as_integers() {
        let rule = EdgeRule {
            action_type: Some(EdgeRuleActionType::SetResponseHeader),
            action_parameter_1: Some("X-Test".to_owned()),
            triggers: vec![EdgeRuleTrigger {
                trigger_type: Some(EdgeRuleTriggerType::Url),
                pattern_matches: vec!["*/index.html".to_owned()],
                pattern_matching_type: Some(MatchingType::Any),
                parameter_1: None,
            }],
            trigger_matching_type: Some(MatchingType::All),
            enabled: Some(true),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            serde_json::json!({
                "ActionType": 5,
                "ActionParameter1": "X-Test",
                "Triggers": [{"Type": 0, "PatternMatches": ["*/index.html"], "PatternMatchingType": 0}],
                "TriggerMatchingType": 1,
                "Enabled": true,
            })
        );
    }
}
