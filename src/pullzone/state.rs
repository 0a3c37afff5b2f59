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

use bunny_client::{PullZone, PullZoneSettings, PullZoneUpdateOptions};
use serde::{Deserialize, Serialize};

use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};
use tf_provider::value::{self, Value, ValueBool, ValueNumber, ValueSet, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::fields::{
    attribute, default_str, default_to, from_remote, from_remote_str, known, known_i32, known_str,
    sensitive, set_as_vec, settled, string_set, string_value, validate_int32, validate_one_of,
};
use crate::sets::{reconcile_str_set, StrSetOpts};
use crate::utils::{WithSchema, WithValidate};

use super::headers::Headers;
use super::limits::Limits;
use super::optimizer::Optimizer;
use super::safehop::SafeHop;

const ORIGIN_SHIELD_ZONE_CODES: &[&str] = &["FR", "IL"];
const ZONE_TYPES: &[i64] = &[0, 1];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PullZoneState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub origin_url: ValueString<'a>,
    #[serde(rename = "type")]
    pub zone_type: ValueNumber,
    pub storage_zone_id: ValueNumber,

    pub aws_signing_enabled: ValueBool,
    pub aws_signing_key: ValueString<'a>,
    pub aws_signing_region_name: ValueString<'a>,
    pub aws_signing_secret: ValueString<'a>,

    pub allowed_referrers: ValueSet<ValueString<'a>>,
    pub blocked_referrers: ValueSet<ValueString<'a>>,
    pub blocked_countries: ValueSet<ValueString<'a>>,
    pub blocked_ips: ValueSet<ValueString<'a>>,
    pub budget_redirected_countries: ValueSet<ValueString<'a>>,
    pub block_post_requests: ValueBool,
    pub block_root_path_access: ValueBool,

    pub cache_control_max_age_override: ValueNumber,
    pub cache_control_browser_max_age_override: ValueNumber,
    pub cache_error_responses: ValueBool,
    pub disable_cookies: ValueBool,
    pub ignore_query_strings: ValueBool,
    pub enable_avif_vary: ValueBool,
    pub enable_cache_slice: ValueBool,
    pub enable_country_code_vary: ValueBool,
    pub enable_hostname_vary: ValueBool,
    pub enable_mobile_vary: ValueBool,
    pub enable_webp_vary: ValueBool,

    pub enable_logging: ValueBool,
    pub enable_origin_shield: ValueBool,
    pub origin_shield_zone_code: ValueString<'a>,
    pub enable_tlsv1: ValueBool,
    pub enable_tls1_1: ValueBool,
    pub verify_origin_ssl: ValueBool,
    pub follow_redirects: ValueBool,

    pub error_page_custom_code: ValueString<'a>,
    pub error_page_enable_custom_code: ValueBool,
    pub error_page_enable_statuspage_widget: ValueBool,
    pub error_page_statuspage_code: ValueString<'a>,
    pub error_page_whitelabel: ValueBool,

    pub log_forwarding_enabled: ValueBool,
    pub log_forwarding_hostname: ValueString<'a>,
    pub log_forwarding_port: ValueNumber,
    pub log_forwarding_token: ValueString<'a>,
    pub logging_ip_anonymization_enabled: ValueBool,
    pub logging_save_to_storage: ValueBool,
    pub logging_storage_zone_id: ValueNumber,
    pub perma_cache_storage_zone_id: ValueNumber,

    pub zone_security_enabled: ValueBool,
    pub zone_security_include_hash_remote_ip: ValueBool,

    // computed
    pub cname_domain: ValueString<'a>,
    pub enabled: ValueBool,
    pub enable_geo_zone_af: ValueBool,
    pub enable_geo_zone_asia: ValueBool,
    pub enable_geo_zone_eu: ValueBool,
    pub enable_geo_zone_sa: ValueBool,
    pub enable_geo_zone_us: ValueBool,
    pub video_library_id: ValueNumber,
    pub zone_security_key: ValueString<'a>,
    pub last_updated: ValueString<'a>,

    #[serde(with = "value::serde_as_vec")]
    pub safehop: Value<SafeHop>,
    #[serde(with = "value::serde_as_vec")]
    pub headers: Value<Headers<'a>>,
    #[serde(with = "value::serde_as_vec")]
    pub limits: Value<Limits>,
    #[serde(with = "value::serde_as_vec")]
    pub optimizer: Value<Optimizer<'a>>,
}

impl<'a> WithSchema for PullZoneState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};
        use AttributeType::{Bool, Number};
        let string = || AttributeType::String;

        let attributes: Vec<(&str, Attribute)> = vec![
            ("id", attribute(string(), Computed, "Numeric id of the pull zone")),
            ("name", attribute(string(), Required, "Name of the pull zone, changing it recreates the pull zone")),
            ("origin_url", attribute(string(), Required, "URL the files are fetched from")),
            ("type", attribute(Number, OptionalComputed, "Type of the pull zone: 0 for standard, 1 for volume")),
            ("storage_zone_id", attribute(Number, Optional, "Storage zone used as origin, changing it recreates the pull zone")),
            ("aws_signing_enabled", attribute(Bool, OptionalComputed, "Sign origin requests for AWS S3")),
            ("aws_signing_key", attribute(string(), Optional, "AWS signing key")),
            ("aws_signing_region_name", attribute(string(), Optional, "AWS signing region")),
            ("aws_signing_secret", sensitive(attribute(string(), Optional, "AWS signing secret"))),
            ("allowed_referrers", attribute(string_set(), Optional, "Referrer hostnames allowed to access the pull zone, all are allowed when empty")),
            ("blocked_referrers", attribute(string_set(), OptionalComputed, "Referrer hostnames denied access to the pull zone")),
            ("blocked_countries", attribute(string_set(), Optional, "Two letter codes of the countries denied access to the pull zone")),
            ("blocked_ips", attribute(string_set(), Optional, "IP addresses denied access to the pull zone")),
            ("budget_redirected_countries", attribute(string_set(), Optional, "Two letter codes of the countries redirected to the budget network")),
            ("block_post_requests", attribute(Bool, OptionalComputed, "Reject POST requests")),
            ("block_root_path_access", attribute(Bool, OptionalComputed, "Reject requests to the root path")),
            ("cache_control_max_age_override", attribute(Number, OptionalComputed, "Cache duration in seconds on the edge, -1 to follow the origin")),
            ("cache_control_browser_max_age_override", attribute(Number, OptionalComputed, "Cache duration in seconds sent to browsers, -1 to follow the origin")),
            ("cache_error_responses", attribute(Bool, OptionalComputed, "Cache error responses of the origin")),
            ("disable_cookies", attribute(Bool, OptionalComputed, "Strip cookies from responses")),
            ("ignore_query_strings", attribute(Bool, OptionalComputed, "Ignore query strings when caching")),
            ("enable_avif_vary", attribute(Bool, OptionalComputed, "Vary the cache on AVIF support")),
            ("enable_cache_slice", attribute(Bool, OptionalComputed, "Cache large files in slices")),
            ("enable_country_code_vary", attribute(Bool, OptionalComputed, "Vary the cache on the client country")),
            ("enable_hostname_vary", attribute(Bool, OptionalComputed, "Vary the cache on the hostname")),
            ("enable_mobile_vary", attribute(Bool, OptionalComputed, "Vary the cache on mobile clients")),
            ("enable_webp_vary", attribute(Bool, OptionalComputed, "Vary the cache on WebP support")),
            ("enable_logging", attribute(Bool, OptionalComputed, "Log requests")),
            ("enable_origin_shield", attribute(Bool, OptionalComputed, "Route origin requests through an origin shield")),
            ("origin_shield_zone_code", attribute(string(), OptionalComputed, "Zone of the origin shield: FR or IL")),
            ("enable_tlsv1", attribute(Bool, OptionalComputed, "Accept TLS 1.0 connections")),
            ("enable_tls1_1", attribute(Bool, OptionalComputed, "Accept TLS 1.1 connections")),
            ("verify_origin_ssl", attribute(Bool, OptionalComputed, "Verify the certificate of the origin")),
            ("follow_redirects", attribute(Bool, OptionalComputed, "Follow redirects of the origin")),
            ("error_page_custom_code", attribute(string(), Optional, "Custom error page code")),
            ("error_page_enable_custom_code", attribute(Bool, OptionalComputed, "Serve the custom error page code")),
            ("error_page_enable_statuspage_widget", attribute(Bool, OptionalComputed, "Show the statuspage widget on error pages")),
            ("error_page_statuspage_code", attribute(string(), Optional, "Statuspage code of the widget")),
            ("error_page_whitelabel", attribute(Bool, OptionalComputed, "Remove the bunny.net branding from error pages")),
            ("log_forwarding_enabled", attribute(Bool, OptionalComputed, "Forward logs to a syslog endpoint")),
            ("log_forwarding_hostname", attribute(string(), Optional, "Hostname logs are forwarded to")),
            ("log_forwarding_port", attribute(Number, OptionalComputed, "Port logs are forwarded to")),
            ("log_forwarding_token", sensitive(attribute(string(), Optional, "Token sent with forwarded logs"))),
            ("logging_ip_anonymization_enabled", attribute(Bool, OptionalComputed, "Anonymize client addresses in logs")),
            ("logging_save_to_storage", attribute(Bool, OptionalComputed, "Save logs to a storage zone")),
            ("logging_storage_zone_id", attribute(Number, OptionalComputed, "Storage zone logs are saved to")),
            ("perma_cache_storage_zone_id", attribute(Number, OptionalComputed, "Storage zone used as perma-cache, 0 to disable it")),
            ("zone_security_enabled", attribute(Bool, OptionalComputed, "Require token authentication")),
            ("zone_security_include_hash_remote_ip", attribute(Bool, OptionalComputed, "Include the client address in the authentication hash")),
            ("cname_domain", attribute(string(), Computed, "CNAME hostnames should point to")),
            ("enabled", attribute(Bool, Computed, "Whether the pull zone is enabled")),
            ("enable_geo_zone_af", attribute(Bool, Computed, "Serve from the Africa region")),
            ("enable_geo_zone_asia", attribute(Bool, Computed, "Serve from the Asia region")),
            ("enable_geo_zone_eu", attribute(Bool, Computed, "Serve from the Europe region")),
            ("enable_geo_zone_sa", attribute(Bool, Computed, "Serve from the South America region")),
            ("enable_geo_zone_us", attribute(Bool, Computed, "Serve from the North America region")),
            ("video_library_id", attribute(Number, Computed, "Video library the pull zone belongs to")),
            ("zone_security_key", sensitive(attribute(string(), Computed, "Token authentication key"))),
            ("last_updated", attribute(string(), Computed, "Time of the last update done by Terraform")),
        ];

        Schema {
            version: 1,
            block: Block {
                attributes: attributes
                    .into_iter()
                    .map(|(name, attr)| (name.to_owned(), attr))
                    .collect(),
                blocks: map! {
                    "safehop" => NestedBlock::Optional(SafeHop::block()),
                    "headers" => NestedBlock::Optional(Headers::block()),
                    "limits" => NestedBlock::Optional(Limits::block()),
                    "optimizer" => NestedBlock::Optional(Optimizer::block()),
                },
                description: Description::plain("bunny.net pull zone"),
                ..Default::default()
            },
        }
    }
}

impl<'a> PullZoneState<'a> {
    /// Plan the defaults of the attributes missing from `config`
    pub(super) fn apply_defaults(&mut self, config: &Self) {
        default_to(&mut self.zone_type, &config.zone_type, 0);
        default_to(&mut self.aws_signing_enabled, &config.aws_signing_enabled, false);
        default_to(&mut self.block_post_requests, &config.block_post_requests, false);
        default_to(&mut self.block_root_path_access, &config.block_root_path_access, false);
        default_to(
            &mut self.cache_control_max_age_override,
            &config.cache_control_max_age_override,
            -1,
        );
        default_to(
            &mut self.cache_control_browser_max_age_override,
            &config.cache_control_browser_max_age_override,
            -1,
        );
        default_to(&mut self.cache_error_responses, &config.cache_error_responses, false);
        default_to(&mut self.disable_cookies, &config.disable_cookies, true);
        default_to(&mut self.ignore_query_strings, &config.ignore_query_strings, true);
        default_to(&mut self.enable_avif_vary, &config.enable_avif_vary, false);
        default_to(&mut self.enable_cache_slice, &config.enable_cache_slice, false);
        default_to(&mut self.enable_country_code_vary, &config.enable_country_code_vary, false);
        default_to(&mut self.enable_hostname_vary, &config.enable_hostname_vary, false);
        default_to(&mut self.enable_mobile_vary, &config.enable_mobile_vary, false);
        default_to(&mut self.enable_webp_vary, &config.enable_webp_vary, false);
        default_to(&mut self.enable_logging, &config.enable_logging, true);
        default_to(&mut self.enable_origin_shield, &config.enable_origin_shield, false);
        default_str(&mut self.origin_shield_zone_code, &config.origin_shield_zone_code, "FR");
        default_to(&mut self.enable_tlsv1, &config.enable_tlsv1, true);
        default_to(&mut self.enable_tls1_1, &config.enable_tls1_1, true);
        default_to(&mut self.verify_origin_ssl, &config.verify_origin_ssl, false);
        default_to(&mut self.follow_redirects, &config.follow_redirects, false);
        default_to(
            &mut self.error_page_enable_custom_code,
            &config.error_page_enable_custom_code,
            false,
        );
        default_to(
            &mut self.error_page_enable_statuspage_widget,
            &config.error_page_enable_statuspage_widget,
            false,
        );
        default_to(&mut self.error_page_whitelabel, &config.error_page_whitelabel, false);
        default_to(&mut self.log_forwarding_enabled, &config.log_forwarding_enabled, false);
        default_to(&mut self.log_forwarding_port, &config.log_forwarding_port, 0);
        default_to(
            &mut self.logging_ip_anonymization_enabled,
            &config.logging_ip_anonymization_enabled,
            true,
        );
        default_to(&mut self.logging_save_to_storage, &config.logging_save_to_storage, false);
        default_to(&mut self.logging_storage_zone_id, &config.logging_storage_zone_id, 0);
        default_to(
            &mut self.perma_cache_storage_zone_id,
            &config.perma_cache_storage_zone_id,
            0,
        );
        default_to(&mut self.zone_security_enabled, &config.zone_security_enabled, false);
        default_to(
            &mut self.zone_security_include_hash_remote_ip,
            &config.zone_security_include_hash_remote_ip,
            false,
        );
        if config.blocked_referrers.is_null() && self.blocked_referrers.is_null() {
            self.blocked_referrers = Value::Unknown;
        }

        if let (Value::Value(planned), Value::Value(config)) = (&mut self.safehop, &config.safehop) {
            planned.apply_defaults(config);
        }
        if let (Value::Value(planned), Value::Value(config)) = (&mut self.headers, &config.headers) {
            planned.apply_defaults(config);
        }
        if let (Value::Value(planned), Value::Value(config)) = (&mut self.limits, &config.limits) {
            planned.apply_defaults(config);
        }
        if let (Value::Value(planned), Value::Value(config)) =
            (&mut self.optimizer, &config.optimizer)
        {
            planned.apply_defaults(config);
        }
    }

    /// Mark every attribute computed by the API as unknown
    pub(super) fn unknown_computed(&mut self) {
        self.id = Value::Unknown;
        self.cname_domain = Value::Unknown;
        self.enabled = Value::Unknown;
        self.enable_geo_zone_af = Value::Unknown;
        self.enable_geo_zone_asia = Value::Unknown;
        self.enable_geo_zone_eu = Value::Unknown;
        self.enable_geo_zone_sa = Value::Unknown;
        self.enable_geo_zone_us = Value::Unknown;
        self.video_library_id = Value::Unknown;
        self.zone_security_key = Value::Unknown;
        self.last_updated = Value::Unknown;
    }

    /// Request applying every mutable attribute
    pub(super) fn to_update_options(&self) -> PullZoneUpdateOptions {
        let mut settings = PullZoneSettings {
            aws_signing_enabled: known(&self.aws_signing_enabled),
            aws_signing_key: known_str(&self.aws_signing_key),
            aws_signing_region_name: known_str(&self.aws_signing_region_name),
            aws_signing_secret: known_str(&self.aws_signing_secret),
            allowed_referrers: set_as_vec(&self.allowed_referrers),
            blocked_referrers: set_as_vec(&self.blocked_referrers),
            blocked_countries: set_as_vec(&self.blocked_countries),
            blocked_ips: set_as_vec(&self.blocked_ips),
            budget_redirected_countries: set_as_vec(&self.budget_redirected_countries),
            block_post_requests: known(&self.block_post_requests),
            block_root_path_access: known(&self.block_root_path_access),
            cache_control_max_age_override: known(&self.cache_control_max_age_override),
            cache_control_public_max_age_override: known(
                &self.cache_control_browser_max_age_override,
            ),
            cache_error_responses: known(&self.cache_error_responses),
            disable_cookies: known(&self.disable_cookies),
            ignore_query_strings: known(&self.ignore_query_strings),
            enable_avif_vary: known(&self.enable_avif_vary),
            enable_cache_slice: known(&self.enable_cache_slice),
            enable_country_code_vary: known(&self.enable_country_code_vary),
            enable_hostname_vary: known(&self.enable_hostname_vary),
            enable_mobile_vary: known(&self.enable_mobile_vary),
            enable_webp_vary: known(&self.enable_webp_vary),
            enable_logging: known(&self.enable_logging),
            enable_origin_shield: known(&self.enable_origin_shield),
            origin_shield_zone_code: known_str(&self.origin_shield_zone_code),
            enable_tls1: known(&self.enable_tlsv1),
            enable_tls1_1: known(&self.enable_tls1_1),
            verify_origin_ssl: known(&self.verify_origin_ssl),
            follow_redirects: known(&self.follow_redirects),
            error_page_custom_code: known_str(&self.error_page_custom_code),
            error_page_enable_custom_code: known(&self.error_page_enable_custom_code),
            error_page_enable_statuspage_widget: known(&self.error_page_enable_statuspage_widget),
            error_page_statuspage_code: known_str(&self.error_page_statuspage_code),
            error_page_whitelabel: known(&self.error_page_whitelabel),
            log_forwarding_enabled: known(&self.log_forwarding_enabled),
            log_forwarding_hostname: known_str(&self.log_forwarding_hostname),
            log_forwarding_port: known_i32(&self.log_forwarding_port),
            log_forwarding_token: known_str(&self.log_forwarding_token),
            logging_ip_anonymization_enabled: known(&self.logging_ip_anonymization_enabled),
            logging_save_to_storage: known(&self.logging_save_to_storage),
            logging_storage_zone_id: known(&self.logging_storage_zone_id),
            perma_cache_storage_zone_id: known(&self.perma_cache_storage_zone_id),
            zone_security_enabled: known(&self.zone_security_enabled),
            zone_security_include_hash_remote_ip: known(&self.zone_security_include_hash_remote_ip),
            ..Default::default()
        };

        if let Value::Value(safehop) = &self.safehop {
            safehop.expand(&mut settings);
        }
        if let Value::Value(headers) = &self.headers {
            headers.expand(&mut settings);
        }
        if let Value::Value(limits) = &self.limits {
            limits.expand(&mut settings);
        }
        if let Value::Value(optimizer) = &self.optimizer {
            optimizer.expand(&mut settings);
        }

        PullZoneUpdateOptions {
            origin_url: known_str(&self.origin_url),
            zone_type: known_i32(&self.zone_type),
            settings,
        }
    }

    /// State of a pull zone returned by the API
    ///
    /// Blocks missing from `prior` stay missing unless `flatten_all` is set, as for an import.
    pub(super) fn from_pull_zone(pz: &PullZone, prior: &Self, flatten_all: bool) -> Self {
        let s = &pz.settings;
        let owned = |value: &Option<String>| string_value(value.clone());

        let safehop = match &prior.safehop {
            Value::Value(prior) => Value::Value(SafeHop::flatten(s, prior)),
            _ if flatten_all => Value::Value(SafeHop::flatten(s, &SafeHop::default())),
            _ => Value::Null,
        };
        let headers = match &prior.headers {
            Value::Value(prior) => Value::Value(Headers::flatten(s, prior)),
            _ if flatten_all => Value::Value(Headers::flatten(s, &Headers::default())),
            _ => Value::Null,
        };
        let limits = if flatten_all || prior.limits.is_value() {
            Value::Value(Limits::flatten(s))
        } else {
            Value::Null
        };
        let optimizer = match &prior.optimizer {
            Value::Value(prior) => Value::Value(Optimizer::flatten(s, prior, flatten_all)),
            _ if flatten_all => Value::Value(Optimizer::flatten(s, &Optimizer::default(), true)),
            _ => Value::Null,
        };

        Self {
            id: Value::from(pz.id.map(|id| Cow::Owned(id.to_string()))),
            name: owned(&pz.name),
            origin_url: owned(&pz.origin_url),
            zone_type: pz.zone_type.map(i64::from).into(),
            storage_zone_id: from_remote(&prior.storage_zone_id, pz.storage_zone_id),

            aws_signing_enabled: s.aws_signing_enabled.into(),
            aws_signing_key: from_remote_str(&prior.aws_signing_key, s.aws_signing_key.clone()),
            aws_signing_region_name: from_remote_str(
                &prior.aws_signing_region_name,
                s.aws_signing_region_name.clone(),
            ),
            aws_signing_secret: from_remote_str(
                &prior.aws_signing_secret,
                s.aws_signing_secret.clone(),
            ),

            allowed_referrers: reconcile_str_set(
                "allowed_referrers",
                &prior.allowed_referrers,
                s.allowed_referrers.clone(),
                StrSetOpts::ORDER_AND_CASE,
            ),
            blocked_referrers: reconcile_str_set(
                "blocked_referrers",
                &settled(&prior.blocked_referrers),
                s.blocked_referrers.clone(),
                StrSetOpts::ORDER,
            ),
            blocked_countries: reconcile_str_set(
                "blocked_countries",
                &prior.blocked_countries,
                s.blocked_countries.clone(),
                StrSetOpts::ORDER_AND_CASE,
            ),
            blocked_ips: reconcile_str_set(
                "blocked_ips",
                &prior.blocked_ips,
                s.blocked_ips.clone(),
                StrSetOpts::ORDER,
            ),
            budget_redirected_countries: reconcile_str_set(
                "budget_redirected_countries",
                &prior.budget_redirected_countries,
                s.budget_redirected_countries.clone(),
                StrSetOpts::ORDER_AND_CASE,
            ),
            block_post_requests: s.block_post_requests.into(),
            block_root_path_access: s.block_root_path_access.into(),

            cache_control_max_age_override: s.cache_control_max_age_override.into(),
            cache_control_browser_max_age_override: s.cache_control_public_max_age_override.into(),
            cache_error_responses: s.cache_error_responses.into(),
            disable_cookies: s.disable_cookies.into(),
            ignore_query_strings: s.ignore_query_strings.into(),
            enable_avif_vary: s.enable_avif_vary.into(),
            enable_cache_slice: s.enable_cache_slice.into(),
            enable_country_code_vary: s.enable_country_code_vary.into(),
            enable_hostname_vary: s.enable_hostname_vary.into(),
            enable_mobile_vary: s.enable_mobile_vary.into(),
            enable_webp_vary: s.enable_webp_vary.into(),

            enable_logging: s.enable_logging.into(),
            enable_origin_shield: s.enable_origin_shield.into(),
            origin_shield_zone_code: owned(&s.origin_shield_zone_code),
            enable_tlsv1: s.enable_tls1.into(),
            enable_tls1_1: s.enable_tls1_1.into(),
            verify_origin_ssl: s.verify_origin_ssl.into(),
            follow_redirects: s.follow_redirects.into(),

            error_page_custom_code: from_remote_str(
                &prior.error_page_custom_code,
                s.error_page_custom_code.clone(),
            ),
            error_page_enable_custom_code: s.error_page_enable_custom_code.into(),
            error_page_enable_statuspage_widget: s.error_page_enable_statuspage_widget.into(),
            error_page_statuspage_code: from_remote_str(
                &prior.error_page_statuspage_code,
                s.error_page_statuspage_code.clone(),
            ),
            error_page_whitelabel: s.error_page_whitelabel.into(),

            log_forwarding_enabled: s.log_forwarding_enabled.into(),
            log_forwarding_hostname: from_remote_str(
                &prior.log_forwarding_hostname,
                s.log_forwarding_hostname.clone(),
            ),
            log_forwarding_port: s.log_forwarding_port.map(i64::from).into(),
            log_forwarding_token: from_remote_str(
                &prior.log_forwarding_token,
                s.log_forwarding_token.clone(),
            ),
            logging_ip_anonymization_enabled: s.logging_ip_anonymization_enabled.into(),
            logging_save_to_storage: s.logging_save_to_storage.into(),
            logging_storage_zone_id: s.logging_storage_zone_id.into(),
            perma_cache_storage_zone_id: s.perma_cache_storage_zone_id.into(),

            zone_security_enabled: s.zone_security_enabled.into(),
            zone_security_include_hash_remote_ip: s.zone_security_include_hash_remote_ip.into(),

            cname_domain: owned(&pz.cname_domain),
            enabled: pz.enabled.into(),
            enable_geo_zone_af: s.enable_geo_zone_af.into(),
            enable_geo_zone_asia: s.enable_geo_zone_asia.into(),
            enable_geo_zone_eu: s.enable_geo_zone_eu.into(),
            enable_geo_zone_sa: s.enable_geo_zone_sa.into(),
            enable_geo_zone_us: s.enable_geo_zone_us.into(),
            video_library_id: pz.video_library_id.into(),
            zone_security_key: owned(&s.zone_security_key),
            last_updated: settled(&prior.last_updated),

            safehop,
            headers,
            limits,
            optimizer,
        }
    }
}

impl<'a> WithValidate for PullZoneState<'a> {
    fn validate(&self, diags: &mut Diagnostics, _attr_path: AttributePath) {
        validate_one_of(
            diags,
            &Value::from(self.origin_shield_zone_code.as_deref_option()),
            ORIGIN_SHIELD_ZONE_CODES,
            AttributePath::new("origin_shield_zone_code"),
        );
        validate_one_of(diags, &self.zone_type, ZONE_TYPES, AttributePath::new("type"));
        validate_int32(diags, &self.log_forwarding_port, AttributePath::new("log_forwarding_port"));

        self.safehop.validate(diags, AttributePath::new("safehop").index(0));
        self.limits.validate(diags, AttributePath::new("limits").index(0));
        self.optimizer.validate(diags, AttributePath::new("optimizer").index(0));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|item| item.to_string()).collect())
    }

    fn full_pull_zone() -> PullZone {
        PullZone {
            id: Some(42),
            name: Some("assets".to_owned()),
            origin_url: Some("https://origin.example.com".to_owned()),
            enabled: Some(true),
            storage_zone_id: Some(7),
            video_library_id: Some(0),
            zone_type: Some(1),
            cname_domain: Some("assets.b-cdn.net".to_owned()),
            hostnames: vec![],
            edge_rules: vec![],
            settings: PullZoneSettings {
                aws_signing_enabled: Some(true),
                aws_signing_key: Some("key".to_owned()),
                aws_signing_region_name: Some("eu-west-1".to_owned()),
                aws_signing_secret: Some("secret".to_owned()),
                allowed_referrers: strings(&["a.example.com"]),
                blocked_referrers: strings(&["b.example.com"]),
                blocked_countries: strings(&["CN", "RU"]),
                blocked_ips: strings(&["10.0.0.1"]),
                budget_redirected_countries: strings(&["BR"]),
                block_post_requests: Some(true),
                block_root_path_access: Some(true),
                cache_control_max_age_override: Some(3600),
                cache_control_public_max_age_override: Some(600),
                cache_error_responses: Some(true),
                disable_cookies: Some(false),
                ignore_query_strings: Some(false),
                enable_avif_vary: Some(true),
                enable_cache_slice: Some(true),
                enable_country_code_vary: Some(true),
                enable_hostname_vary: Some(true),
                enable_mobile_vary: Some(true),
                enable_webp_vary: Some(true),
                enable_geo_zone_af: Some(true),
                enable_geo_zone_asia: Some(true),
                enable_geo_zone_eu: Some(true),
                enable_geo_zone_sa: Some(true),
                enable_geo_zone_us: Some(true),
                enable_logging: Some(false),
                enable_origin_shield: Some(true),
                origin_shield_zone_code: Some("IL".to_owned()),
                enable_tls1: Some(false),
                enable_tls1_1: Some(false),
                verify_origin_ssl: Some(true),
                follow_redirects: Some(true),
                error_page_custom_code: Some("<html/>".to_owned()),
                error_page_enable_custom_code: Some(true),
                error_page_enable_statuspage_widget: Some(true),
                error_page_statuspage_code: Some("abc".to_owned()),
                error_page_whitelabel: Some(true),
                log_forwarding_enabled: Some(true),
                log_forwarding_hostname: Some("logs.example.com".to_owned()),
                log_forwarding_port: Some(514),
                log_forwarding_token: Some("token".to_owned()),
                logging_ip_anonymization_enabled: Some(false),
                logging_save_to_storage: Some(true),
                logging_storage_zone_id: Some(8),
                perma_cache_storage_zone_id: Some(9),
                zone_security_enabled: Some(true),
                zone_security_include_hash_remote_ip: Some(true),
                zone_security_key: Some("zone-key".to_owned()),
                connection_limit_per_ip_count: Some(10),
                request_limit: Some(100),
                monthly_bandwidth_limit: Some(1 << 40),
                enable_safe_hop: Some(true),
                origin_connect_timeout: Some(5),
                origin_response_timeout: Some(30),
                origin_retries: Some(2),
                origin_retry_5xx_responses: Some(true),
                origin_retry_connection_timeout: Some(false),
                origin_retry_delay: Some(3),
                origin_retry_response_timeout: Some(false),
                enable_access_control_origin_header: Some(false),
                access_control_origin_header_extensions: strings(&["css", "woff"]),
                add_canonical_header: Some(true),
                add_host_header: Some(true),
                optimizer_enabled: Some(true),
                optimizer_enable_webp: Some(false),
                optimizer_minify_css: Some(false),
                optimizer_minify_javascript: Some(false),
                optimizer_enable_manipulation_engine: Some(false),
                optimizer_automatic_optimization_enabled: Some(false),
                optimizer_desktop_max_width: Some(1280),
                optimizer_image_quality: Some(75),
                optimizer_mobile_max_width: Some(480),
                optimizer_mobile_image_quality: Some(50),
                optimizer_watermark_enabled: Some(false),
                optimizer_watermark_url: Some("https://example.com/w.png".to_owned()),
                optimizer_watermark_offset: Some(1.5),
                optimizer_watermark_min_image_size: Some(200),
                optimizer_watermark_position: Some(2),
            },
        }
    }

    #[test]
    fn update_request_reproduces_remote_settings() {
        let pz = full_pull_zone();
        let state = PullZoneState::from_pull_zone(&pz, &Default::default(), true);
        let options = state.to_update_options();

        let mut expected = pz.settings.clone();
        // computed by the API
        expected.zone_security_key = None;
        expected.enable_geo_zone_af = None;
        expected.enable_geo_zone_asia = None;
        expected.enable_geo_zone_eu = None;
        expected.enable_geo_zone_sa = None;
        expected.enable_geo_zone_us = None;

        assert_eq!(options.settings, expected);
        assert_eq!(options.origin_url, pz.origin_url);
        assert_eq!(options.zone_type, Some(1));
    }

    #[test]
    fn read_keeps_absent_blocks_absent() {
        let pz = full_pull_zone();
        let prior = PullZoneState {
            limits: Value::Value(Limits::default()),
            ..Default::default()
        };
        let state = PullZoneState::from_pull_zone(&pz, &prior, false);
        assert!(state.safehop.is_null());
        assert!(state.headers.is_null());
        assert!(state.optimizer.is_null());
        assert_eq!(
            state.limits.as_ref_option().map(|limits| limits.request_limit.clone()),
            Some(Value::Value(100))
        );
        assert_eq!(state.id.as_str(), "42");
        assert_eq!(state.zone_security_key.as_str(), "zone-key");
    }

    #[test]
    fn unset_optional_strings_stay_null() {
        let mut pz = full_pull_zone();
        pz.settings.aws_signing_key = Some(String::new());
        pz.settings.allowed_referrers = Some(vec![]);
        let state = PullZoneState::from_pull_zone(&pz, &Default::default(), false);
        assert!(state.aws_signing_key.is_null());
        assert!(state.allowed_referrers.is_null());
    }

    #[test]
    fn plan_fills_defaults() {
        let config = PullZoneState {
            name: Value::Value("assets".into()),
            origin_url: Value::Value("https://origin.example.com".into()),
            enable_logging: Value::Value(false),
            safehop: Value::Value(SafeHop::default()),
            ..Default::default()
        };
        let mut planned = config.clone();
        planned.apply_defaults(&config);

        assert_eq!(planned.zone_type, Value::Value(0));
        assert_eq!(planned.enable_logging, Value::Value(false));
        assert_eq!(planned.disable_cookies, Value::Value(true));
        assert_eq!(planned.cache_control_max_age_override, Value::Value(-1));
        assert_eq!(planned.origin_shield_zone_code.as_str(), "FR");
        assert!(planned.blocked_referrers.is_unknown());
        assert!(planned.headers.is_null());
        assert_eq!(
            planned.safehop.as_ref_option().map(|s| s.origin_connect_timeout.clone()),
            Some(Value::Value(10))
        );
    }

    #[test]
    fn unknown_config_value_is_not_defaulted() {
        let config = PullZoneState {
            enable_logging: Value::Unknown,
            ..Default::default()
        };
        let mut planned = config.clone();
        planned.apply_defaults(&config);
        assert!(planned.enable_logging.is_unknown());
    }

    #[test]
    fn validation_reports_attribute_paths() {
        let config = PullZoneState {
            origin_shield_zone_code: Value::Value("DE".into()),
            zone_type: Value::Value(2),
            log_forwarding_port: Value::Value(1 << 33),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        config.validate(&mut diags, AttributePath::default());
        let paths = diags
            .errors
            .iter()
            .map(|diag| diag.attribute.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            paths,
            vec![
                AttributePath::new("origin_shield_zone_code"),
                AttributePath::new("type"),
                AttributePath::new("log_forwarding_port"),
            ]
        );
    }
}
