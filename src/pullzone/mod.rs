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

mod data_source;
mod headers;
mod limits;
mod optimizer;
mod safehop;
mod state;

use async_trait::async_trait;
use bunny_client::PullZoneAddOptions;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::fields::{computed_unknown, id_as_i64, keep_prior, known, known_i32, known_str};
use crate::provider::ClientHandle;
use crate::utils::{no_errors, now_rfc3339, report, WithSchema, WithValidate};

pub use data_source::PullZoneDataSource;
pub use state::PullZoneState;

#[derive(Debug, Default, Clone)]
pub struct PullZoneResource {
    client: ClientHandle,
}

impl PullZoneResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for PullZoneResource {
    type State<'a> = PullZoneState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(PullZoneState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, Default::default());
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
        let id = id_as_i64(diags, &state.id)?;

        match client.pull_zone_get(id).await {
            Ok(pz) => Some((
                PullZoneState::from_pull_zone(&pz, &state, false),
                private_state,
            )),
            Err(err) => {
                report(diags, "could not retrieve pull zone", &err);
                None
            }
        }
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
        state.unknown_computed();
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
        if config_state.blocked_referrers.is_null() {
            keep_prior(&mut state.blocked_referrers, &prior_state.blocked_referrers);
        }
        keep_prior(&mut state.id, &prior_state.id);
        keep_prior(&mut state.cname_domain, &prior_state.cname_domain);
        keep_prior(&mut state.last_updated, &prior_state.last_updated);

        let mut replace = vec![];
        if state.name != prior_state.name {
            replace.push(AttributePath::new("name"));
        }
        if state.storage_zone_id != prior_state.storage_zone_id {
            replace.push(AttributePath::new("storage_zone_id"));
        }

        if state != prior_state {
            // values the API derives from the other settings
            computed_unknown(&mut state.enabled);
            computed_unknown(&mut state.enable_geo_zone_af);
            computed_unknown(&mut state.enable_geo_zone_asia);
            computed_unknown(&mut state.enable_geo_zone_eu);
            computed_unknown(&mut state.enable_geo_zone_sa);
            computed_unknown(&mut state.enable_geo_zone_us);
            computed_unknown(&mut state.video_library_id);
            computed_unknown(&mut state.zone_security_key);
            computed_unknown(&mut state.last_updated);
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

        let options = PullZoneAddOptions {
            name: known_str(&planned_state.name).unwrap_or_default(),
            origin_url: known_str(&planned_state.origin_url).unwrap_or_default(),
            storage_zone_id: known(&planned_state.storage_zone_id),
            zone_type: known_i32(&planned_state.zone_type).unwrap_or_default(),
        };
        let added = match client.pull_zone_add(&options).await {
            Ok(pz) => pz,
            Err(err) => {
                report(diags, "creating pull zone failed", &err);
                return None;
            }
        };
        let Some(id) = added.id else {
            diags.root_error(
                "creating pull zone failed",
                format!("the API returned no id for the pull zone {:?}", options.name),
            );
            return None;
        };
        info!(id, name = %options.name, "pull zone created");

        let mut state = match client
            .pull_zone_update(id, &planned_state.to_update_options())
            .await
        {
            Ok(updated) => PullZoneState::from_pull_zone(&updated, &planned_state, false),
            Err(err) => {
                warn!(id, "pull zone created but its settings were not applied");
                report(diags, "setting pull zone attributes via update failed", &err);
                PullZoneState::from_pull_zone(&added, &planned_state, false)
            }
        };
        state.last_updated = Value::Value(now_rfc3339().into());

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
        let id = id_as_i64(diags, &prior_state.id)?;

        match client
            .pull_zone_update(id, &planned_state.to_update_options())
            .await
        {
            Ok(updated) => {
                info!(id, "pull zone updated");
                let mut state = PullZoneState::from_pull_zone(&updated, &planned_state, false);
                state.last_updated = Value::Value(now_rfc3339().into());
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "updating pull zone via API failed", &err);
                None
            }
        }
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.get(diags)?;
        let id = id_as_i64(diags, &prior_state.id)?;

        match client.pull_zone_delete(id).await {
            Ok(()) => {
                info!(id, "pull zone deleted");
                Some(())
            }
            Err(err) => {
                report(diags, "could not delete pull zone", &err);
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let id = id_as_i64(diags, &Value::Value(id.into()))?;

        match client.pull_zone_get(id).await {
            Ok(pz) => Some((
                PullZoneState::from_pull_zone(&pz, &Default::default(), true),
                Default::default(),
            )),
            Err(err) => {
                report(diags, "could not retrieve pull zone", &err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn prior() -> PullZoneState<'static> {
        let mut config = PullZoneState {
            name: Value::Value("assets".into()),
            origin_url: Value::Value("https://origin.example.com".into()),
            ..Default::default()
        };
        let snapshot = config.clone();
        config.apply_defaults(&snapshot);
        PullZoneState {
            id: Value::Value("42".into()),
            cname_domain: Value::Value("assets.b-cdn.net".into()),
            enabled: Value::Value(true),
            blocked_referrers: Value::Null,
            last_updated: Value::Value("2024-01-01T00:00:00Z".into()),
            ..config
        }
    }

    fn config_of(state: &PullZoneState<'static>) -> PullZoneState<'static> {
        PullZoneState {
            name: state.name.clone(),
            origin_url: state.origin_url.clone(),
            storage_zone_id: state.storage_zone_id.clone(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn plan_create_leaves_computed_unknown() {
        let resource = PullZoneResource::default();
        let config = config_of(&prior());
        let mut diags = Diagnostics::default();
        let (planned, _) = resource
            .plan_create(&mut diags, config.clone(), config, ValueEmpty::default())
            .await
            .unwrap();
        assert!(planned.id.is_unknown());
        assert!(planned.cname_domain.is_unknown());
        assert!(planned.last_updated.is_unknown());
        assert_eq!(planned.enable_tlsv1, Value::Value(true));
    }

    #[tokio::test]
    async fn unchanged_plan_keeps_last_updated() {
        let resource = PullZoneResource::default();
        let prior = prior();
        let config = config_of(&prior);
        let mut diags = Diagnostics::default();
        let (planned, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                prior.clone(),
                config,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await
            .unwrap();
        assert_eq!(planned, prior);
        assert!(replace.is_empty());
    }

    #[tokio::test]
    async fn renaming_replaces_the_zone() {
        let resource = PullZoneResource::default();
        let prior = prior();
        let mut proposed = prior.clone();
        proposed.name = Value::Value("renamed".into());
        proposed.storage_zone_id = Value::Value(3);
        let config = config_of(&proposed);
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
        assert_eq!(
            replace,
            vec![AttributePath::new("name"), AttributePath::new("storage_zone_id")]
        );
        assert!(planned.last_updated.is_unknown());
        assert_eq!(planned.id, prior.id);
    }

    #[tokio::test]
    async fn operations_need_a_configured_provider() {
        let resource = PullZoneResource::default();
        let mut diags = Diagnostics::default();
        let read = resource
            .read(&mut diags, prior(), ValueEmpty::default(), ValueEmpty::default())
            .await;
        assert!(read.is_none());
        assert_eq!(diags.errors[0].summary, "provider is not configured");
    }
}
