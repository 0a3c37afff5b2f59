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

mod certificate;
mod timeouts;

use async_trait::async_trait;
use bunny_client::{
    AddCertificateOptions, AddCustomHostnameOptions, Client, Hostname, PullZone,
    RemoveCertificateOptions, RemoveCustomHostnameOptions, SetForceSslOptions,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use tf_provider::schema::{
    AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};
use tf_provider::value::{self, Value, ValueBool, ValueEmpty, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics, Resource};

use crate::fields::{
    attribute, default_to, id_as_i64, keep_prior, known, required_number, sensitive, string_value,
};
use crate::provider::ClientHandle;
use crate::utils::{no_errors, report};

use certificate::{load_free_certificate_with_retry, LOAD_TIMEOUT};
use timeouts::{create_timeout, Timeouts};

#[derive(Debug, Default, Clone)]
pub struct HostnameResource {
    client: ClientHandle,
}

impl HostnameResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HostnameState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub pull_zone_id: ValueNumber,
    pub hostname: ValueString<'a>,
    pub force_ssl: ValueBool,
    pub is_system_hostname: ValueBool,
    pub has_certificate: ValueBool,
    pub load_free_certificate: ValueBool,
    #[serde(borrow = "'a")]
    #[serde(with = "value::serde_as_vec")]
    pub certificate: Value<Certificate<'a>>,
    #[serde(borrow = "'a")]
    #[serde(with = "value::serde_as_vec")]
    pub timeouts: Value<Timeouts<'a>>,
}

/// Custom certificate, uploaded on creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Certificate<'a> {
    #[serde(borrow = "'a")]
    pub certificate_data: ValueString<'a>,
    pub private_key_data: ValueString<'a>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostnameLookupError {
    #[error("hostname not found")]
    NotFound,
    #[error("found hostname entry id is empty")]
    EmptyId,
}

/// Id of the hostname entry of `pz` whose value is `hostname`
pub fn find_hostname_id(pz: &PullZone, hostname: &str) -> Result<i64, HostnameLookupError> {
    for entry in &pz.hostnames {
        let Some(value) = entry.value.as_deref() else {
            warn!(
                pull_zone_id = pz.id,
                "bunny.net api returned a hostname element without value"
            );
            continue;
        };
        if value == hostname {
            return entry.id.ok_or(HostnameLookupError::EmptyId);
        }
    }
    Err(HostnameLookupError::NotFound)
}

fn schema() -> Schema {
    use AttributeConstraint::{Computed, OptionalComputed, Required};
    use AttributeType::{Bool, Number};
    Schema {
        version: 1,
        block: Block {
            attributes: map! {
                "id" => attribute(AttributeType::String, Computed, "Numeric id of the hostname"),
                "pull_zone_id" => attribute(Number, Required, "The ID of the pull zone to that the hostname belongs"),
                "hostname" => attribute(AttributeType::String, Required, "The hostname value for the domain name"),
                "force_ssl" => attribute(Bool, OptionalComputed, "Determines if the Force SSL feature is enabled"),
                "is_system_hostname" => attribute(Bool, Computed, "Determines if this is a system hostname controlled by bunny.net"),
                "has_certificate" => attribute(Bool, Computed, "Determines if the hostname has an SSL certificate configured"),
                "load_free_certificate" => attribute(Bool, OptionalComputed, "Determines if a free SSL certificate should be generated and loaded for the hostname"),
            },
            blocks: map! {
                "certificate" => NestedBlock::Optional(Block {
                    attributes: map! {
                        "certificate_data" => sensitive(attribute(AttributeType::String, Required, "The public key")),
                        "private_key_data" => sensitive(attribute(AttributeType::String, Required, "The private key")),
                    },
                    description: Description::plain("Custom SSL certificate of the hostname"),
                    ..Default::default()
                }),
                "timeouts" => Timeouts::block(),
            },
            description: Description::plain("Custom hostname of a pull zone"),
            ..Default::default()
        },
    }
}

impl<'a> HostnameState<'a> {
    fn validate(&self, diags: &mut Diagnostics) {
        if self.load_free_certificate == Value::Value(true) && self.certificate.is_value() {
            diags.error_short(
                "only one of \"load_free_certificate\" or \"certificate\" can be set",
                AttributePath::new("certificate"),
            );
        }
        if let Err(err) = create_timeout(&self.timeouts, LOAD_TIMEOUT) {
            diags.error_short(
                err.to_string(),
                AttributePath::new("timeouts").index(0).attribute("create"),
            );
        }
    }

    /// Certificate to remove before the hostname
    fn certificate_removal(&self) -> Option<RemoveCertificateOptions> {
        self.certificate.is_value().then(|| RemoveCertificateOptions {
            hostname: self.hostname.as_str().to_owned(),
        })
    }

    /// Copy the remote fields of `remote` into the state
    fn refresh(&mut self, remote: &Hostname) {
        if let Some(id) = remote.id {
            self.id = Value::Value(id.to_string().into());
        }
        self.hostname = string_value(remote.value.clone());
        self.force_ssl = remote.force_ssl.into();
        self.is_system_hostname = remote.is_system_hostname.into();
        self.has_certificate = remote.has_certificate.into();
    }

    /// Computed fields that could not be read back
    fn settle_unknown(&mut self) {
        for field in [
            &mut self.force_ssl,
            &mut self.is_system_hostname,
            &mut self.has_certificate,
        ] {
            if field.is_unknown() {
                *field = Value::Null;
            }
        }
    }
}

impl HostnameResource {
    /// Settings applied after the hostname is added
    ///
    /// Errors are reported, the hostname exists either way.
    async fn configure_new(
        &self,
        diags: &mut Diagnostics,
        client: &Client,
        pull_zone_id: i64,
        state: &HostnameState<'_>,
        config: &HostnameState<'_>,
    ) {
        let hostname = state.hostname.as_str();

        if let Value::Value(force_ssl) = config.force_ssl {
            let options = SetForceSslOptions {
                hostname: hostname.to_owned(),
                force_ssl,
            };
            if let Err(err) = client.hostname_set_force_ssl(pull_zone_id, &options).await {
                report(diags, "setting force_ssl failed", &err);
            }
        }

        if state.load_free_certificate == Value::Value(true) {
            let timeout = create_timeout(&state.timeouts, LOAD_TIMEOUT).unwrap_or(LOAD_TIMEOUT);
            let result = load_free_certificate_with_retry(hostname, timeout, || {
                client.load_free_certificate(hostname)
            })
            .await;
            match result {
                Ok(attempts) => info!(hostname, attempts, "free certificate loaded"),
                Err(err) => diags.root_error(
                    "creating hostname succeeded, loading free ssl certificate failed",
                    err.to_string(),
                ),
            }
        }

        if let Value::Value(certificate) = &state.certificate {
            let options = AddCertificateOptions {
                hostname: hostname.to_owned(),
                certificate: certificate.certificate_data.as_str().to_owned(),
                certificate_key: certificate.private_key_data.as_str().to_owned(),
            };
            if let Err(err) = client.certificate_add(pull_zone_id, &options).await {
                report(diags, "uploading certificate failed", &err);
            }
        }
    }
}

#[async_trait]
impl Resource for HostnameResource {
    type State<'a> = HostnameState<'a>;
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
        let id = id_as_i64(diags, &state.id)?;

        let pz = match client.pull_zone_get(pull_zone_id).await {
            Ok(pz) => pz,
            Err(err) => {
                report(diags, "retrieving pull zone failed", &err);
                return None;
            }
        };
        if pz.hostnames.is_empty() {
            diags.root_error_short("pull zone has an empty hostname list");
            return None;
        }
        let Some(remote) = pz.hostnames.iter().find(|entry| entry.id == Some(id)) else {
            diags.root_error(
                "hostname not found",
                format!("pull zone with id {pull_zone_id}, has no hostname with id: {id}"),
            );
            return None;
        };

        let mut state = state;
        state.refresh(remote);
        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        default_to(
            &mut state.load_free_certificate,
            &config_state.load_free_certificate,
            false,
        );
        if config_state.force_ssl.is_null() {
            state.force_ssl = Value::Unknown;
        }
        state.id = Value::Unknown;
        state.is_system_hostname = Value::Unknown;
        state.has_certificate = Value::Unknown;
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
        default_to(
            &mut state.load_free_certificate,
            &config_state.load_free_certificate,
            false,
        );
        if config_state.force_ssl.is_null() {
            keep_prior(&mut state.force_ssl, &prior_state.force_ssl);
        }
        keep_prior(&mut state.id, &prior_state.id);
        keep_prior(&mut state.is_system_hostname, &prior_state.is_system_hostname);
        keep_prior(&mut state.has_certificate, &prior_state.has_certificate);

        let mut replace = vec![];
        if state.pull_zone_id != prior_state.pull_zone_id {
            replace.push(AttributePath::new("pull_zone_id"));
        }
        if state.hostname != prior_state.hostname {
            replace.push(AttributePath::new("hostname"));
        }
        if state.load_free_certificate != prior_state.load_free_certificate {
            replace.push(AttributePath::new("load_free_certificate"));
        }
        if state.certificate != prior_state.certificate {
            replace.push(AttributePath::new("certificate"));
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
        config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let pull_zone_id = required_number(diags, &planned_state.pull_zone_id, "pull_zone_id")?;
        let hostname = planned_state.hostname.as_str().to_owned();

        let options = AddCustomHostnameOptions {
            hostname: hostname.clone(),
        };
        if let Err(err) = client.hostname_add(pull_zone_id, &options).await {
            report(diags, "could not add hostname", &err);
            return None;
        }

        let id = match client.pull_zone_get(pull_zone_id).await {
            Ok(pz) => find_hostname_id(&pz, &hostname).map_err(|err| err.to_string()),
            Err(err) => Err(format!("retrieving pull zone failed: {err}")),
        };
        let id = match id {
            Ok(id) => id,
            Err(detail) => {
                warn!(pull_zone_id, hostname = %hostname, "hostname added but its id is unknown");
                diags.root_error(
                    "creating hostname succeeded, retrieving its ID afterwards failed",
                    detail,
                );
                return None;
            }
        };
        info!(pull_zone_id, id, hostname = %hostname, "hostname created");

        let mut state = planned_state;
        state.id = Value::Value(id.to_string().into());
        self.configure_new(diags, client, pull_zone_id, &state, &config_state)
            .await;

        match client.pull_zone_get(pull_zone_id).await {
            Ok(pz) => {
                if let Some(remote) = pz.hostnames.iter().find(|entry| entry.id == Some(id)) {
                    state.refresh(remote);
                }
            }
            Err(err) => report(diags, "retrieving pull zone failed", &err),
        }
        state.settle_unknown();

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

        if planned_state.force_ssl != prior_state.force_ssl {
            if let Some(force_ssl) = known(&planned_state.force_ssl) {
                let options = SetForceSslOptions {
                    hostname: planned_state.hostname.as_str().to_owned(),
                    force_ssl,
                };
                if let Err(err) = client.hostname_set_force_ssl(pull_zone_id, &options).await {
                    report(diags, "updating force_ssl failed", &err);
                    return None;
                }
                info!(pull_zone_id, hostname = planned_state.hostname.as_str(), force_ssl, "hostname updated");
            }
        }

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
        let hostname = prior_state.hostname.as_str();

        if let Some(options) = prior_state.certificate_removal() {
            if let Err(err) = client.certificate_remove(pull_zone_id, &options).await {
                report(diags, "could not remove certificate", &err);
                return None;
            }
            info!(pull_zone_id, hostname, "certificate removed");
        }

        let options = RemoveCustomHostnameOptions {
            hostname: hostname.to_owned(),
        };
        match client.hostname_remove(pull_zone_id, &options).await {
            Ok(()) => {
                info!(pull_zone_id, hostname, "hostname removed");
                Some(())
            }
            Err(err) => {
                report(diags, "could not remove hostname", &err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(id: Option<i64>, value: Option<&str>) -> Hostname {
        Hostname {
            id,
            value: value.map(str::to_owned),
            ..Default::default()
        }
    }

    fn zone(hostnames: Vec<Hostname>) -> PullZone {
        PullZone {
            id: Some(7),
            hostnames,
            ..Default::default()
        }
    }

    fn prior() -> HostnameState<'static> {
        HostnameState {
            id: Value::Value("12".into()),
            pull_zone_id: Value::Value(7),
            hostname: Value::Value("cdn.example.com".into()),
            force_ssl: Value::Value(false),
            is_system_hostname: Value::Value(false),
            has_certificate: Value::Value(true),
            load_free_certificate: Value::Value(true),
            certificate: Value::Null,
            timeouts: Value::Null,
        }
    }

    fn config_of(state: &HostnameState<'static>) -> HostnameState<'static> {
        HostnameState {
            pull_zone_id: state.pull_zone_id.clone(),
            hostname: state.hostname.clone(),
            load_free_certificate: state.load_free_certificate.clone(),
            certificate: state.certificate.clone(),
            ..Default::default()
        }
    }

    #[test]
    fn id_is_found_by_value() {
        let pz = zone(vec![
            entry(Some(1), None),
            entry(Some(2), Some("assets.b-cdn.net")),
            entry(Some(3), Some("cdn.example.com")),
        ]);
        assert_eq!(find_hostname_id(&pz, "cdn.example.com"), Ok(3));
        assert_eq!(
            find_hostname_id(&pz, "www.example.com"),
            Err(HostnameLookupError::NotFound)
        );
    }

    #[test]
    fn entry_without_id_is_an_error() {
        let pz = zone(vec![entry(None, Some("cdn.example.com"))]);
        let err = find_hostname_id(&pz, "cdn.example.com").unwrap_err();
        assert_eq!(err.to_string(), "found hostname entry id is empty");
    }

    #[tokio::test]
    async fn free_and_custom_certificates_exclude_each_other() {
        let resource = HostnameResource::default();
        let mut config = config_of(&prior());
        config.certificate = Value::Value(Certificate {
            certificate_data: Value::Value("cert".into()),
            private_key_data: Value::Value("key".into()),
        });
        let mut diags = Diagnostics::default();
        assert_eq!(resource.validate(&mut diags, config.clone()).await, None);
        assert_eq!(diags.errors[0].attribute, AttributePath::new("certificate"));

        config.load_free_certificate = Value::Null;
        let mut diags = Diagnostics::default();
        assert_eq!(resource.validate(&mut diags, config).await, Some(()));
    }

    #[tokio::test]
    async fn create_timeout_is_validated() {
        let resource = HostnameResource::default();
        let mut config = config_of(&prior());
        config.timeouts = Value::Value(Timeouts {
            create: Value::Value("ten minutes".into()),
        });
        let mut diags = Diagnostics::default();
        assert_eq!(resource.validate(&mut diags, config.clone()).await, None);
        assert_eq!(
            diags.errors[0].attribute,
            AttributePath::new("timeouts").index(0).attribute("create")
        );

        config.timeouts = Value::Value(Timeouts {
            create: Value::Value("45m".into()),
        });
        let mut diags = Diagnostics::default();
        assert_eq!(resource.validate(&mut diags, config).await, Some(()));
    }

    #[test]
    fn custom_certificate_is_removed_first() {
        assert_eq!(prior().certificate_removal(), None);

        let mut state = prior();
        state.certificate = Value::Value(Certificate {
            certificate_data: Value::Value("cert".into()),
            private_key_data: Value::Value("key".into()),
        });
        assert_eq!(
            state.certificate_removal(),
            Some(RemoveCertificateOptions {
                hostname: "cdn.example.com".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn plan_create_defaults() {
        let resource = HostnameResource::default();
        let mut config = config_of(&prior());
        config.load_free_certificate = Value::Null;
        let mut diags = Diagnostics::default();
        let (planned, _) = resource
            .plan_create(&mut diags, config.clone(), config, ValueEmpty::default())
            .await
            .unwrap();
        assert_eq!(planned.load_free_certificate, Value::Value(false));
        assert!(planned.id.is_unknown());
        assert!(planned.force_ssl.is_unknown());
        assert!(planned.has_certificate.is_unknown());
    }

    #[tokio::test]
    async fn only_force_ssl_is_updated_in_place() {
        let resource = HostnameResource::default();
        let prior = prior();

        let mut proposed = prior.clone();
        proposed.force_ssl = Value::Value(true);
        let mut config = config_of(&prior);
        config.force_ssl = Value::Value(true);
        let mut diags = Diagnostics::default();
        let (planned, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                proposed,
                config,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await
            .unwrap();
        assert!(replace.is_empty());
        assert_eq!(planned.force_ssl, Value::Value(true));
        assert_eq!(planned.id, prior.id);

        let mut proposed = prior.clone();
        proposed.load_free_certificate = Value::Value(false);
        proposed.hostname = Value::Value("www.example.com".into());
        let config = config_of(&proposed);
        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                proposed,
                config,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await
            .unwrap();
        assert_eq!(
            replace,
            vec![
                AttributePath::new("hostname"),
                AttributePath::new("load_free_certificate")
            ]
        );
    }

    #[test]
    fn refresh_reads_remote_flags() {
        let mut state = prior();
        state.is_system_hostname = Value::Unknown;
        state.refresh(&Hostname {
            id: Some(12),
            value: Some("cdn.example.com".to_owned()),
            force_ssl: Some(true),
            is_system_hostname: Some(false),
            has_certificate: None,
        });
        assert_eq!(state.force_ssl, Value::Value(true));
        assert_eq!(state.is_system_hostname, Value::Value(false));
        assert!(state.has_certificate.is_null());

        let mut state = prior();
        state.force_ssl = Value::Unknown;
        state.settle_unknown();
        assert!(state.force_ssl.is_null());
        assert_eq!(state.has_certificate, Value::Value(true));
    }
}
