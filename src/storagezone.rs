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

//! Storage zones
//!
//! Name and region of a zone can not be changed, and replication regions can only be
//! added. Recreating the zone would delete the files it stores, so these changes are
//! rejected at plan time instead of triggering a replacement.

use std::borrow::Cow;

use async_trait::async_trait;
use bunny_client::{StorageZone, StorageZoneAddOptions, StorageZoneUpdateOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueEmpty, ValueNumber, ValueSet, ValueString};
use tf_provider::{map, AttributePath, Diagnostics, Resource};

use crate::fields::{
    attribute, computed_unknown, id_as_i64, keep_prior, known, known_str, sensitive, set_strings,
    settled, string_set, string_value, validate_one_of,
};
use crate::provider::ClientHandle;
use crate::sets::{reconcile_str_set, StrSetOpts};
use crate::utils::{no_errors, now_rfc3339, report};

const REGIONS: &[&str] = &["DE", "NY", "LA", "SG", "SYD", "UK", "SE", "BR", "JH"];

#[derive(Debug, Default, Clone)]
pub struct StorageZoneResource {
    client: ClientHandle,
}

impl StorageZoneResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorageZoneState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub region: ValueString<'a>,
    pub replication_regions: ValueSet<ValueString<'a>>,
    pub origin_url: ValueString<'a>,
    pub custom_404_file_path: ValueString<'a>,
    pub rewrite_404_to_200: ValueBool,

    pub user_id: ValueString<'a>,
    pub password: ValueString<'a>,
    pub read_only_password: ValueString<'a>,
    pub date_modified: ValueString<'a>,
    pub deleted: ValueBool,
    pub storage_used: ValueNumber,
    pub files_stored: ValueNumber,
    pub last_updated: ValueString<'a>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImmutableError {
    #[error("'name' is immutable")]
    Name,
    #[error("'region' is immutable")]
    Region,
    #[error("'replication_regions' can be added but not removed (removed: {})", .0.join(", "))]
    ReplicationRegionsRemoved(Vec<String>),
}

impl ImmutableError {
    pub fn attribute(&self) -> AttributePath {
        AttributePath::new(match self {
            ImmutableError::Name => "name",
            ImmutableError::Region => "region",
            ImmutableError::ReplicationRegionsRemoved(_) => "replication_regions",
        })
    }
}

/// Reject the changes the API can not apply to an existing zone
///
/// Values not known yet are not compared.
pub fn check_storage_zone_change(
    prior: &StorageZoneState,
    planned: &StorageZoneState,
) -> Result<(), ImmutableError> {
    let differs = |prior: &ValueString, planned: &ValueString| {
        prior.is_value() && planned.is_value() && prior != planned
    };
    if differs(&prior.name, &planned.name) {
        return Err(ImmutableError::Name);
    }
    if differs(&prior.region, &planned.region) {
        return Err(ImmutableError::Region);
    }

    if !planned.replication_regions.is_unknown() {
        let kept = set_strings(&planned.replication_regions);
        let removed = set_strings(&prior.replication_regions)
            .into_iter()
            .filter(|region| !kept.iter().any(|kept| kept.eq_ignore_ascii_case(region)))
            .collect::<Vec<_>>();
        if !removed.is_empty() {
            return Err(ImmutableError::ReplicationRegionsRemoved(removed));
        }
    }
    Ok(())
}

/// Known `planned` value when it differs from `prior`
///
/// A field removed from the configuration is sent as `cleared`, the API keeps omitted fields.
fn changed<T: Clone + PartialEq>(
    planned: &Value<T>,
    prior: &Value<T>,
    cleared: T,
) -> Option<T> {
    match (planned, prior) {
        (Value::Null, Value::Value(_)) => Some(cleared),
        _ if planned != prior => known(planned),
        _ => None,
    }
}

fn schema() -> Schema {
    use AttributeConstraint::{Computed, Optional, Required};
    use AttributeType::{Bool, Number};
    Schema {
        version: 1,
        block: Block {
            attributes: map! {
                "id" => attribute(AttributeType::String, Computed, "Numeric id of the storage zone"),
                "name" => attribute(AttributeType::String, Required, "The name of the storage zone"),
                "region" => attribute(AttributeType::String, Required, "The code of the main storage zone region (Possible values: DE, NY, LA, SG, SYD, UK, SE, BR, JH)"),
                "replication_regions" => attribute(string_set(), Optional, "The codes of the regions the zone is replicated to, regions can be added but not removed"),
                "origin_url" => attribute(AttributeType::String, Optional, "The origin URL of the storage zone"),
                "custom_404_file_path" => attribute(AttributeType::String, Optional, "The path to the custom file that will be returned in a case of 404"),
                "rewrite_404_to_200" => attribute(Bool, Optional, "Rewrite 404 status code to 200 for URLs without extension"),
                "user_id" => attribute(AttributeType::String, Computed, "Owner of the storage zone"),
                "password" => sensitive(attribute(AttributeType::String, Computed, "The password granting read/write access to the storage zone")),
                "read_only_password" => sensitive(attribute(AttributeType::String, Computed, "The password granting read-only access to the storage zone")),
                "date_modified" => attribute(AttributeType::String, Computed, "The last modified date of the storage zone"),
                "deleted" => attribute(Bool, Computed, "Whether the zone is deleted"),
                "storage_used" => attribute(Number, Computed, "The amount of storage used in the storage zone in bytes"),
                "files_stored" => attribute(Number, Computed, "The number of files stored in the storage zone"),
                "last_updated" => attribute(AttributeType::String, Computed, "Time of the last update done by Terraform"),
            },
            description: Description::plain("bunny.net storage zone"),
            ..Default::default()
        },
    }
}

impl<'a> StorageZoneState<'a> {
    fn validate(&self, diags: &mut Diagnostics) {
        validate_one_of(
            diags,
            &Value::from(self.region.as_deref_option()),
            REGIONS,
            AttributePath::new("region"),
        );
        for region in set_strings(&self.replication_regions) {
            validate_one_of(
                diags,
                &Value::Value(region.as_str()),
                REGIONS,
                AttributePath::new("replication_regions"),
            );
            if self.region.as_deref_option() == Some(region.as_str()) {
                diags.error_short(
                    format!("{region:?} was specified as primary and replication region"),
                    AttributePath::new("replication_regions"),
                );
            }
        }
    }

    fn add_options(&self) -> StorageZoneAddOptions {
        StorageZoneAddOptions {
            name: self.name.as_str().to_owned(),
            region: self.region.as_str().to_owned(),
            replication_regions: set_strings(&self.replication_regions),
            origin_url: known_str(&self.origin_url),
        }
    }

    /// Update request with the fields that changed since `prior`
    fn update_options(&self, prior: &Self) -> StorageZoneUpdateOptions {
        StorageZoneUpdateOptions {
            replication_regions: set_strings(&self.replication_regions),
            origin_url: changed(&self.origin_url, &prior.origin_url, Cow::Borrowed(""))
                .map(Cow::into_owned),
            custom_404_file_path: changed(
                &self.custom_404_file_path,
                &prior.custom_404_file_path,
                Cow::Borrowed(""),
            )
            .map(Cow::into_owned),
            rewrite_404_to_200: changed(&self.rewrite_404_to_200, &prior.rewrite_404_to_200, false),
        }
    }

    /// Settings applied by the Add request alone
    ///
    /// The others stay unset so the next plan sends them again.
    fn applied_by_add(&self) -> Self {
        Self {
            custom_404_file_path: Value::Null,
            rewrite_404_to_200: Value::Null,
            ..self.clone()
        }
    }

    /// State of `sz`
    ///
    /// The settings the API does not return are taken from `prior`.
    fn from_storage_zone(sz: &StorageZone, prior: &Self) -> Self {
        Self {
            id: Value::from(sz.id.map(|id| Cow::Owned(id.to_string()))),
            name: string_value(sz.name.clone()),
            region: string_value(sz.region.clone()),
            replication_regions: reconcile_str_set(
                "replication_regions",
                &settled(&prior.replication_regions),
                Some(sz.replication_regions.clone()),
                StrSetOpts::ORDER_AND_CASE,
            ),
            origin_url: settled(&prior.origin_url),
            custom_404_file_path: settled(&prior.custom_404_file_path),
            rewrite_404_to_200: settled(&prior.rewrite_404_to_200),
            user_id: string_value(sz.user_id.clone()),
            password: string_value(sz.password.clone()),
            read_only_password: string_value(sz.read_only_password.clone()),
            date_modified: string_value(sz.date_modified.clone()),
            deleted: sz.deleted.into(),
            storage_used: sz.storage_used.into(),
            files_stored: sz.files_stored.into(),
            last_updated: settled(&prior.last_updated),
        }
    }
}

#[async_trait]
impl Resource for StorageZoneResource {
    type State<'a> = StorageZoneState<'a>;
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
        let id = id_as_i64(diags, &state.id)?;

        match client.storage_zone_get(id).await {
            Ok(sz) => Some((StorageZoneState::from_storage_zone(&sz, &state), private_state)),
            Err(err) => {
                report(diags, "could not retrieve storage zone", &err);
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        computed_unknown(&mut state.id);
        computed_unknown(&mut state.user_id);
        computed_unknown(&mut state.password);
        computed_unknown(&mut state.read_only_password);
        computed_unknown(&mut state.date_modified);
        computed_unknown(&mut state.deleted);
        computed_unknown(&mut state.storage_used);
        computed_unknown(&mut state.files_stored);
        computed_unknown(&mut state.last_updated);
        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<AttributePath>,
    )> {
        if let Err(err) = check_storage_zone_change(&prior_state, &proposed_state) {
            diags.error_short(err.to_string(), err.attribute());
            return None;
        }

        let mut state = proposed_state;
        keep_prior(&mut state.id, &prior_state.id);
        keep_prior(&mut state.user_id, &prior_state.user_id);
        keep_prior(&mut state.password, &prior_state.password);
        keep_prior(&mut state.read_only_password, &prior_state.read_only_password);
        keep_prior(&mut state.deleted, &prior_state.deleted);
        keep_prior(&mut state.date_modified, &prior_state.date_modified);
        keep_prior(&mut state.storage_used, &prior_state.storage_used);
        keep_prior(&mut state.files_stored, &prior_state.files_stored);
        keep_prior(&mut state.last_updated, &prior_state.last_updated);

        if state != prior_state {
            computed_unknown(&mut state.date_modified);
            computed_unknown(&mut state.storage_used);
            computed_unknown(&mut state.files_stored);
            computed_unknown(&mut state.last_updated);
        }
        Some((state, prior_private_state, vec![]))
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

        let added = match client.storage_zone_add(&planned_state.add_options()).await {
            Ok(sz) => sz,
            Err(err) => {
                report(diags, "creating storage zone failed", &err);
                return None;
            }
        };
        let Some(id) = added.id else {
            diags.root_error(
                "creating storage zone failed",
                format!("the API returned no id for the storage zone {:?}", planned_state.name.as_str()),
            );
            return None;
        };
        info!(id, name = planned_state.name.as_str(), "storage zone created");

        // Add only accepts part of the settings
        let options = planned_state.update_options(&Default::default());
        let updated = match client.storage_zone_update(id, &options).await {
            Ok(()) => client.storage_zone_get(id).await,
            Err(err) => Err(err),
        };
        let mut state = match updated {
            Ok(sz) => StorageZoneState::from_storage_zone(&sz, &planned_state),
            Err(err) => {
                warn!(id, "storage zone created but its settings were not applied");
                report(diags, "setting storage zone attributes via update failed", &err);
                StorageZoneState::from_storage_zone(&added, &planned_state.applied_by_add())
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

        let options = planned_state.update_options(&prior_state);
        if let Err(err) = client.storage_zone_update(id, &options).await {
            report(diags, "updating storage zone via API failed", &err);
            return None;
        }
        info!(id, "storage zone updated");

        match client.storage_zone_get(id).await {
            Ok(sz) => {
                let mut state = StorageZoneState::from_storage_zone(&sz, &planned_state);
                state.last_updated = Value::Value(now_rfc3339().into());
                Some((state, planned_private_state))
            }
            Err(err) => {
                report(diags, "fetching updated storage zone via API failed", &err);
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

        match client.storage_zone_delete(id).await {
            Ok(()) => {
                info!(id, "storage zone deleted");
                Some(())
            }
            Err(err) => {
                report(diags, "could not delete storage zone", &err);
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

        match client.storage_zone_get(id).await {
            Ok(sz) => Some((
                StorageZoneState::from_storage_zone(&sz, &Default::default()),
                Default::default(),
            )),
            Err(err) => {
                report(diags, "could not retrieve storage zone", &err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::fields::value_set;

    use super::*;

    fn regions(items: &[&str]) -> ValueSet<ValueString<'static>> {
        value_set(items.iter().map(|item| item.to_string()))
    }

    fn prior() -> StorageZoneState<'static> {
        StorageZoneState {
            id: Value::Value("5".into()),
            name: Value::Value("assets".into()),
            region: Value::Value("DE".into()),
            replication_regions: regions(&["NY", "SG"]),
            origin_url: Value::Value("https://origin.example.com".into()),
            ..Default::default()
        }
    }

    #[test]
    fn name_and_region_are_immutable() {
        let mut planned = prior();
        planned.name = Value::Value("renamed".into());
        let err = check_storage_zone_change(&prior(), &planned).unwrap_err();
        assert_eq!(err.to_string(), "'name' is immutable");

        let mut planned = prior();
        planned.region = Value::Value("NY".into());
        assert_eq!(
            check_storage_zone_change(&prior(), &planned),
            Err(ImmutableError::Region)
        );
    }

    #[test]
    fn replication_regions_only_grow() {
        let mut planned = prior();
        planned.replication_regions = regions(&["NY", "SG", "LA"]);
        assert_eq!(check_storage_zone_change(&prior(), &planned), Ok(()));

        planned.replication_regions = regions(&["NY"]);
        let err = check_storage_zone_change(&prior(), &planned).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("'replication_regions' can be added but not removed"));
        assert_eq!(err.attribute(), AttributePath::new("replication_regions"));

        planned.replication_regions = Value::Unknown;
        assert_eq!(check_storage_zone_change(&prior(), &planned), Ok(()));
    }

    #[tokio::test]
    async fn changes_are_rejected_before_any_request() {
        let resource = StorageZoneResource::default();
        let mut proposed = prior();
        proposed.replication_regions = Value::Null;
        let mut diags = Diagnostics::default();
        let planned = resource
            .plan_update(
                &mut diags,
                prior(),
                proposed.clone(),
                proposed,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await;
        assert!(planned.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn primary_region_is_not_a_replica() {
        let resource = StorageZoneResource::default();
        let mut config = prior();
        config.replication_regions = regions(&["DE", "XX"]);
        let mut diags = Diagnostics::default();
        assert_eq!(resource.validate(&mut diags, config).await, None);
        let summaries = diags
            .errors
            .iter()
            .map(|diag| &*diag.summary)
            .collect::<Vec<_>>();
        assert_eq!(
            summaries,
            vec![
                "\"DE\" was specified as primary and replication region",
                "invalid value XX"
            ]
        );
    }

    #[test]
    fn update_sends_changed_fields() {
        let mut planned = prior();
        planned.rewrite_404_to_200 = Value::Value(true);
        let options = planned.update_options(&prior());
        assert_eq!(
            options,
            StorageZoneUpdateOptions {
                replication_regions: vec!["NY".to_owned(), "SG".to_owned()],
                rewrite_404_to_200: Some(true),
                ..Default::default()
            }
        );

        let options = planned.update_options(&Default::default());
        assert_eq!(
            options.origin_url.as_deref(),
            Some("https://origin.example.com")
        );
    }

    #[test]
    fn removed_settings_are_cleared() {
        let mut prior = prior();
        prior.custom_404_file_path = Value::Value("/404.html".into());
        prior.rewrite_404_to_200 = Value::Value(true);
        let planned = StorageZoneState {
            origin_url: Value::Null,
            custom_404_file_path: Value::Null,
            rewrite_404_to_200: Value::Null,
            ..prior.clone()
        };
        let options = planned.update_options(&prior);
        assert_eq!(options.origin_url.as_deref(), Some(""));
        assert_eq!(options.custom_404_file_path.as_deref(), Some(""));
        assert_eq!(options.rewrite_404_to_200, Some(false));

        let options = prior.update_options(&prior);
        assert_eq!(options.origin_url, None);
        assert_eq!(options.rewrite_404_to_200, None);
    }

    #[test]
    fn failed_create_update_keeps_add_settings_only() {
        let added = StorageZone {
            id: Some(5),
            name: Some("assets".to_owned()),
            region: Some("DE".to_owned()),
            replication_regions: vec!["NY".to_owned(), "SG".to_owned()],
            ..Default::default()
        };
        let mut planned = prior();
        planned.custom_404_file_path = Value::Value("/404.html".into());
        planned.rewrite_404_to_200 = Value::Value(true);

        let state = StorageZoneState::from_storage_zone(&added, &planned.applied_by_add());
        assert_eq!(state.origin_url, planned.origin_url);
        assert!(state.custom_404_file_path.is_null());
        assert!(state.rewrite_404_to_200.is_null());

        // the next apply retries the settings the update did not set
        let options = planned.update_options(&state);
        assert_eq!(options.custom_404_file_path.as_deref(), Some("/404.html"));
        assert_eq!(options.rewrite_404_to_200, Some(true));
        assert_eq!(options.origin_url, None);
    }

    #[tokio::test]
    async fn destroy_plan_keeps_no_private_state() {
        let resource = StorageZoneResource::default();
        let mut diags = Diagnostics::default();
        let private = resource
            .plan_destroy(&mut diags, prior(), ValueEmpty::default(), ValueEmpty::default())
            .await;
        assert_eq!(private, Some(ValueEmpty::default()));
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn read_keeps_settings_the_api_does_not_return() {
        let sz = StorageZone {
            id: Some(5),
            name: Some("assets".to_owned()),
            region: Some("DE".to_owned()),
            replication_regions: vec!["sg".to_owned(), "ny".to_owned()],
            storage_used: Some(1024),
            ..Default::default()
        };
        let mut prior = prior();
        prior.last_updated = Value::Unknown;
        let state = StorageZoneState::from_storage_zone(&sz, &prior);
        assert_eq!(state.replication_regions, prior.replication_regions);
        assert_eq!(state.origin_url, prior.origin_url);
        assert_eq!(state.storage_used, Value::Value(1024));
        assert!(state.last_updated.is_null());
        assert!(state.password.is_null());
    }
}
