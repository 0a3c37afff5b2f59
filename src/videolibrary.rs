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

//! Video libraries
//!
//! Settings without a default are optional and computed: the API fills them when they are
//! not configured.
//! The token settings are write-only, the API never returns them.

use std::borrow::Cow;

use async_trait::async_trait;
use bunny_client::{
    VideoLibrary, VideoLibraryAddOptions, VideoLibrarySettings, VideoLibraryUpdateOptions,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueBool, ValueEmpty, ValueNumber, ValueSet, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::fields::{
    attribute, computed_unknown, default_str, default_to, id_as_i64, known, known_i32, known_str,
    sensitive, set_strings, settled, string_set, string_value, validate_int32, validate_one_of,
};
use crate::provider::ClientHandle;
use crate::sets::{normalize, normalize_str_list, reconcile_str_set, StrSetOpts};
use crate::utils::{no_errors, report};

const REPLICATION_REGIONS: &[&str] = &["UK", "SE", "NY", "LA", "SG", "SY", "BR", "JH"];

#[derive(Debug, Default, Clone)]
pub struct VideoLibraryResource {
    client: ClientHandle,
}

impl VideoLibraryResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VideoLibraryState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub replication_regions: ValueSet<ValueString<'a>>,

    pub watermark_position_left: ValueNumber,
    pub watermark_position_top: ValueNumber,
    pub watermark_width: ValueNumber,
    pub watermark_height: ValueNumber,
    pub enabled_resolutions: ValueString<'a>,
    pub vi_ai_publisher_id: ValueString<'a>,
    pub vast_tag_url: ValueString<'a>,
    pub webhook_url: ValueString<'a>,
    pub captions_font_size: ValueNumber,
    pub captions_font_color: ValueString<'a>,
    pub captions_background: ValueString<'a>,
    pub ui_language: ValueString<'a>,
    pub allow_early_play: ValueBool,
    pub player_token_authentication_enabled: ValueBool,
    pub block_none_referrer: ValueBool,
    pub enable_mp4_fallback: ValueBool,
    pub keep_original_files: ValueBool,
    pub allow_direct_play: ValueBool,
    pub enable_drm: ValueBool,
    pub bitrate_240p: ValueNumber,
    pub bitrate_360p: ValueNumber,
    pub bitrate_480p: ValueNumber,
    pub bitrate_720p: ValueNumber,
    pub bitrate_1080p: ValueNumber,
    pub bitrate_1440p: ValueNumber,
    pub bitrate_2160p: ValueNumber,
    pub show_heatmap: ValueBool,
    pub enable_content_tagging: ValueBool,
    pub custom_html: ValueString<'a>,
    pub controls: ValueString<'a>,
    pub player_key_color: ValueString<'a>,
    pub font_family: ValueString<'a>,

    pub enable_token_authentication: ValueBool,
    pub enable_token_ip_verification: ValueBool,
    pub reset_token: ValueBool,

    pub video_count: ValueNumber,
    pub traffic_usage: ValueNumber,
    pub storage_usage: ValueNumber,
    pub date_created: ValueString<'a>,
    pub api_key: ValueString<'a>,
    pub read_only_api_key: ValueString<'a>,
    pub api_access_key: ValueString<'a>,
    pub has_watermark: ValueBool,
    pub pull_zone_id: ValueNumber,
    pub storage_zone_id: ValueNumber,
    pub pull_zone_type: ValueNumber,
    pub allowed_referrers: ValueSet<ValueString<'a>>,
    pub blocked_referrers: ValueSet<ValueString<'a>>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "'replication_regions' can not be mutated.\n\
     This error occurred when attempting to update values {from:?} to {to:?}.\n\
     To modify an existing 'replication_regions' the 'bunny_videolibrary' must be deleted and recreated.\n\
     WARNING: deleting a 'bunny_videolibrary' will also delete all the data it contains!"
)]
pub struct ImmutableReplicationRegions {
    pub from: Vec<String>,
    pub to: Vec<String>,
}

/// Reject any change of the replication regions of an existing library
pub fn check_video_library_change(
    prior: &VideoLibraryState,
    planned: &VideoLibraryState,
) -> Result<(), ImmutableReplicationRegions> {
    if planned.replication_regions.is_unknown() {
        return Ok(());
    }
    let from = set_strings(&prior.replication_regions);
    let to = set_strings(&planned.replication_regions);
    if normalize(&from, StrSetOpts::ORDER_AND_CASE) == normalize(&to, StrSetOpts::ORDER_AND_CASE) {
        Ok(())
    } else {
        Err(ImmutableReplicationRegions { from, to })
    }
}

fn schema() -> Schema {
    use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};
    use AttributeType::{Bool, Number};
    let string = || AttributeType::String;
    let setting =
        |attr_type: AttributeType, description: &str| attribute(attr_type, OptionalComputed, description);

    let attributes: Vec<(&str, Attribute)> = vec![
        ("id", attribute(string(), Computed, "Numeric id of the video library")),
        ("name", attribute(string(), Required, "The name of the Video Library")),
        ("replication_regions", attribute(string_set(), Optional, "The geo-replication regions of the underlying storage zone, they can not be changed once the library exists")),
        ("watermark_position_left", setting(Number, "The left offset of the watermark position (in %)")),
        ("watermark_position_top", setting(Number, "The top offset of the watermark position (in %)")),
        ("watermark_width", setting(Number, "The width of the watermark (in %)")),
        ("watermark_height", setting(Number, "The height of the watermark (in %)")),
        ("enabled_resolutions", setting(string(), "The comma separated list of enabled resolutions. Possible values: 240p, 360p, 480p, 720p, 1080p, 1440p, 2160p")),
        ("vi_ai_publisher_id", setting(string(), "The vi.ai publisher id for advertising configuration")),
        ("vast_tag_url", setting(string(), "The URL of the VAST tag endpoint for advertising configuration")),
        ("webhook_url", setting(string(), "The webhook URL of the video library")),
        ("captions_font_size", setting(Number, "The captions display font size")),
        ("captions_font_color", setting(string(), "The captions display font color")),
        ("captions_background", setting(string(), "The captions display background color")),
        ("ui_language", setting(string(), "The UI language of the player")),
        ("allow_early_play", setting(Bool, "Determines if the Early-Play feature is enabled")),
        ("player_token_authentication_enabled", setting(Bool, "Determines if the player token authentication is enabled")),
        ("block_none_referrer", setting(Bool, "Determines if requests without a referrer are blocked")),
        ("enable_mp4_fallback", setting(Bool, "Determines if the MP4 fallback feature is enabled")),
        ("keep_original_files", setting(Bool, "Determines if the original video files should be stored after encoding")),
        ("allow_direct_play", setting(Bool, "Determines direct play URLs are enabled for the library")),
        ("enable_drm", setting(Bool, "Determines if the MediaCage basic DRM is enabled")),
        ("bitrate_240p", setting(Number, "The bitrate used for encoding 240p videos")),
        ("bitrate_360p", setting(Number, "The bitrate used for encoding 360p videos")),
        ("bitrate_480p", setting(Number, "The bitrate used for encoding 480p videos")),
        ("bitrate_720p", setting(Number, "The bitrate used for encoding 720p videos")),
        ("bitrate_1080p", setting(Number, "The bitrate used for encoding 1080p videos")),
        ("bitrate_1440p", setting(Number, "The bitrate used for encoding 1440p videos")),
        ("bitrate_2160p", setting(Number, "The bitrate used for encoding 2160p videos")),
        ("show_heatmap", setting(Bool, "Determines if the video watch heatmap should be displayed in the player")),
        ("enable_content_tagging", setting(Bool, "Determines if content tagging should be enabled for this library")),
        ("custom_html", setting(string(), "The custom HTML that is added into the head of the HTML player")),
        ("controls", setting(string(), "The comma separated list of controls that will be displayed in the video player")),
        ("player_key_color", setting(string(), "The key color of the player")),
        ("font_family", setting(string(), "The captions font family")),
        ("enable_token_authentication", attribute(Bool, Optional, "Determines if the token authentication should be enabled")),
        ("enable_token_ip_verification", attribute(Bool, Optional, "Determines if the token IP verification should be enabled")),
        ("reset_token", attribute(Bool, Optional, "Reset the token authentication key on the next update")),
        ("video_count", attribute(Number, Computed, "The number of videos in the video library")),
        ("traffic_usage", attribute(Number, Computed, "The amount of traffic usage this month")),
        ("storage_usage", attribute(Number, Computed, "The total amount of storage used by the library")),
        ("date_created", attribute(string(), Computed, "The date when the video library was created")),
        ("api_key", sensitive(attribute(string(), Computed, "The API key used for authenticating with the video library"))),
        ("read_only_api_key", sensitive(attribute(string(), Computed, "The read-only API key used for authenticating with the video library"))),
        ("api_access_key", sensitive(attribute(string(), Computed, "The API access key for the library"))),
        ("has_watermark", attribute(Bool, Computed, "Determines if the video library has a watermark configured")),
        ("pull_zone_id", attribute(Number, Computed, "The ID of the connected underlying pull zone")),
        ("storage_zone_id", attribute(Number, Computed, "The ID of the connected underlying storage zone")),
        ("pull_zone_type", attribute(Number, Computed, "The type of the pull zone attached. Premium = 0, Volume = 1")),
        ("allowed_referrers", attribute(string_set(), Computed, "The referrer domains allowed to access the library")),
        ("blocked_referrers", attribute(string_set(), Computed, "The referrer domains blocked from accessing the library")),
    ];

    Schema {
        version: 1,
        block: Block {
            attributes: attributes
                .into_iter()
                .map(|(name, attr)| (name.to_owned(), attr))
                .collect(),
            description: Description::plain("bunny.net Stream video library"),
            ..Default::default()
        },
    }
}

fn number(remote: Option<i32>) -> ValueNumber {
    remote.map(i64::from).into()
}

impl<'a> VideoLibraryState<'a> {
    fn validate(&self, diags: &mut Diagnostics) {
        for region in set_strings(&self.replication_regions) {
            validate_one_of(
                diags,
                &Value::Value(region.as_str()),
                REPLICATION_REGIONS,
                AttributePath::new("replication_regions"),
            );
        }
        for (name, value) in [
            ("watermark_position_left", &self.watermark_position_left),
            ("watermark_position_top", &self.watermark_position_top),
            ("watermark_width", &self.watermark_width),
            ("watermark_height", &self.watermark_height),
            ("captions_font_size", &self.captions_font_size),
            ("bitrate_240p", &self.bitrate_240p),
            ("bitrate_360p", &self.bitrate_360p),
            ("bitrate_480p", &self.bitrate_480p),
            ("bitrate_720p", &self.bitrate_720p),
            ("bitrate_1080p", &self.bitrate_1080p),
            ("bitrate_1440p", &self.bitrate_1440p),
            ("bitrate_2160p", &self.bitrate_2160p),
        ] {
            validate_int32(diags, value, AttributePath::new(name));
        }
    }

    fn apply_defaults(&mut self, config: &Self) {
        default_str(
            &mut self.enabled_resolutions,
            &config.enabled_resolutions,
            "240p,360p,480p,720p,1080p",
        );
        default_to(&mut self.bitrate_240p, &config.bitrate_240p, 600);
        default_to(&mut self.bitrate_360p, &config.bitrate_360p, 800);
        default_to(&mut self.bitrate_480p, &config.bitrate_480p, 1400);
        default_to(&mut self.bitrate_720p, &config.bitrate_720p, 2800);
        default_to(&mut self.bitrate_1080p, &config.bitrate_1080p, 5000);
        default_to(&mut self.bitrate_1440p, &config.bitrate_1440p, 8000);
        default_to(&mut self.bitrate_2160p, &config.bitrate_2160p, 25000);
        default_str(&mut self.font_family, &config.font_family, "Rubik");
        default_to(&mut self.block_none_referrer, &config.block_none_referrer, true);
        default_to(&mut self.enable_mp4_fallback, &config.enable_mp4_fallback, true);
        default_to(&mut self.keep_original_files, &config.keep_original_files, true);
        default_to(&mut self.allow_direct_play, &config.allow_direct_play, true);
        default_to(&mut self.enable_content_tagging, &config.enable_content_tagging, true);
    }

    /// Settings left to the API on creation
    fn unknown_unset(&mut self, config: &Self) {
        for (planned, config) in [
            (&mut self.watermark_position_left, &config.watermark_position_left),
            (&mut self.watermark_position_top, &config.watermark_position_top),
            (&mut self.watermark_width, &config.watermark_width),
            (&mut self.watermark_height, &config.watermark_height),
            (&mut self.captions_font_size, &config.captions_font_size),
        ] {
            if config.is_null() {
                *planned = Value::Unknown;
            }
        }
        for (planned, config) in [
            (&mut self.vi_ai_publisher_id, &config.vi_ai_publisher_id),
            (&mut self.vast_tag_url, &config.vast_tag_url),
            (&mut self.webhook_url, &config.webhook_url),
            (&mut self.captions_font_color, &config.captions_font_color),
            (&mut self.captions_background, &config.captions_background),
            (&mut self.ui_language, &config.ui_language),
            (&mut self.custom_html, &config.custom_html),
            (&mut self.controls, &config.controls),
            (&mut self.player_key_color, &config.player_key_color),
        ] {
            if config.is_null() {
                *planned = Value::Unknown;
            }
        }
        for (planned, config) in [
            (&mut self.allow_early_play, &config.allow_early_play),
            (
                &mut self.player_token_authentication_enabled,
                &config.player_token_authentication_enabled,
            ),
            (&mut self.enable_drm, &config.enable_drm),
            (&mut self.show_heatmap, &config.show_heatmap),
        ] {
            if config.is_null() {
                *planned = Value::Unknown;
            }
        }
    }

    fn unknown_computed(&mut self) {
        computed_unknown(&mut self.id);
        computed_unknown(&mut self.video_count);
        computed_unknown(&mut self.traffic_usage);
        computed_unknown(&mut self.storage_usage);
        computed_unknown(&mut self.date_created);
        computed_unknown(&mut self.api_key);
        computed_unknown(&mut self.read_only_api_key);
        computed_unknown(&mut self.api_access_key);
        computed_unknown(&mut self.has_watermark);
        computed_unknown(&mut self.pull_zone_id);
        computed_unknown(&mut self.storage_zone_id);
        computed_unknown(&mut self.pull_zone_type);
        computed_unknown(&mut self.allowed_referrers);
        computed_unknown(&mut self.blocked_referrers);
    }

    fn update_options(&self) -> VideoLibraryUpdateOptions {
        VideoLibraryUpdateOptions {
            name: known_str(&self.name),
            enable_token_authentication: known(&self.enable_token_authentication),
            enable_token_ip_verification: known(&self.enable_token_ip_verification),
            reset_token: known(&self.reset_token),
            settings: VideoLibrarySettings {
                watermark_position_left: known_i32(&self.watermark_position_left),
                watermark_position_top: known_i32(&self.watermark_position_top),
                watermark_width: known_i32(&self.watermark_width),
                watermark_height: known_i32(&self.watermark_height),
                enabled_resolutions: known_str(&self.enabled_resolutions),
                vi_ai_publisher_id: known_str(&self.vi_ai_publisher_id),
                vast_tag_url: known_str(&self.vast_tag_url),
                webhook_url: known_str(&self.webhook_url),
                captions_font_size: known_i32(&self.captions_font_size),
                captions_font_color: known_str(&self.captions_font_color),
                captions_background: known_str(&self.captions_background),
                ui_language: known_str(&self.ui_language),
                allow_early_play: known(&self.allow_early_play),
                player_token_authentication_enabled: known(&self.player_token_authentication_enabled),
                block_none_referrer: known(&self.block_none_referrer),
                enable_mp4_fallback: known(&self.enable_mp4_fallback),
                keep_original_files: known(&self.keep_original_files),
                allow_direct_play: known(&self.allow_direct_play),
                enable_drm: known(&self.enable_drm),
                bitrate_240p: known_i32(&self.bitrate_240p),
                bitrate_360p: known_i32(&self.bitrate_360p),
                bitrate_480p: known_i32(&self.bitrate_480p),
                bitrate_720p: known_i32(&self.bitrate_720p),
                bitrate_1080p: known_i32(&self.bitrate_1080p),
                bitrate_1440p: known_i32(&self.bitrate_1440p),
                bitrate_2160p: known_i32(&self.bitrate_2160p),
                show_heatmap: known(&self.show_heatmap),
                enable_content_tagging: known(&self.enable_content_tagging),
                custom_html: known_str(&self.custom_html),
                controls: known_str(&self.controls),
                player_key_color: known_str(&self.player_key_color),
                font_family: known_str(&self.font_family),
            },
        }
    }

    /// Planned state without the write-only settings
    ///
    /// Used when only the Add request went through, so the next plan sends them again.
    fn applied_by_add(&self) -> Self {
        Self {
            enable_token_authentication: Value::Null,
            enable_token_ip_verification: Value::Null,
            reset_token: Value::Null,
            ..self.clone()
        }
    }

    /// State of `vl`
    ///
    /// The write-only settings are taken from `prior`.
    fn from_video_library(vl: &VideoLibrary, prior: &Self) -> Self {
        let s = &vl.settings;
        let owned = |value: &Option<String>| string_value(value.clone());

        let enabled_resolutions = match (&prior.enabled_resolutions, &s.enabled_resolutions) {
            (Value::Value(prior), Some(remote))
                if normalize_str_list(prior) == normalize_str_list(remote) =>
            {
                Value::Value(Cow::Owned(prior.to_string()))
            }
            (_, remote) => owned(remote),
        };

        Self {
            id: Value::from(vl.id.map(|id| Cow::Owned(id.to_string()))),
            name: owned(&vl.name),
            replication_regions: reconcile_str_set(
                "replication_regions",
                &settled(&prior.replication_regions),
                Some(vl.replication_regions.clone()),
                StrSetOpts::ORDER_AND_CASE,
            ),

            watermark_position_left: number(s.watermark_position_left),
            watermark_position_top: number(s.watermark_position_top),
            watermark_width: number(s.watermark_width),
            watermark_height: number(s.watermark_height),
            enabled_resolutions,
            vi_ai_publisher_id: owned(&s.vi_ai_publisher_id),
            vast_tag_url: owned(&s.vast_tag_url),
            webhook_url: owned(&s.webhook_url),
            captions_font_size: number(s.captions_font_size),
            captions_font_color: owned(&s.captions_font_color),
            captions_background: owned(&s.captions_background),
            ui_language: owned(&s.ui_language),
            allow_early_play: s.allow_early_play.into(),
            player_token_authentication_enabled: s.player_token_authentication_enabled.into(),
            block_none_referrer: s.block_none_referrer.into(),
            enable_mp4_fallback: s.enable_mp4_fallback.into(),
            keep_original_files: s.keep_original_files.into(),
            allow_direct_play: s.allow_direct_play.into(),
            enable_drm: s.enable_drm.into(),
            bitrate_240p: number(s.bitrate_240p),
            bitrate_360p: number(s.bitrate_360p),
            bitrate_480p: number(s.bitrate_480p),
            bitrate_720p: number(s.bitrate_720p),
            bitrate_1080p: number(s.bitrate_1080p),
            bitrate_1440p: number(s.bitrate_1440p),
            bitrate_2160p: number(s.bitrate_2160p),
            show_heatmap: s.show_heatmap.into(),
            enable_content_tagging: s.enable_content_tagging.into(),
            custom_html: owned(&s.custom_html),
            controls: owned(&s.controls),
            player_key_color: owned(&s.player_key_color),
            font_family: owned(&s.font_family),

            enable_token_authentication: settled(&prior.enable_token_authentication),
            enable_token_ip_verification: settled(&prior.enable_token_ip_verification),
            reset_token: settled(&prior.reset_token),

            video_count: vl.video_count.into(),
            traffic_usage: vl.traffic_usage.into(),
            storage_usage: vl.storage_usage.into(),
            date_created: owned(&vl.date_created),
            api_key: owned(&vl.api_key),
            read_only_api_key: owned(&vl.read_only_api_key),
            api_access_key: owned(&vl.api_access_key),
            has_watermark: vl.has_watermark.into(),
            pull_zone_id: vl.pull_zone_id.into(),
            storage_zone_id: vl.storage_zone_id.into(),
            pull_zone_type: number(vl.pull_zone_type),
            allowed_referrers: reconcile_str_set(
                "allowed_referrers",
                &settled(&prior.allowed_referrers),
                Some(vl.allowed_referrers.clone()),
                StrSetOpts::ORDER_AND_CASE,
            ),
            blocked_referrers: reconcile_str_set(
                "blocked_referrers",
                &settled(&prior.blocked_referrers),
                Some(vl.blocked_referrers.clone()),
                StrSetOpts::ORDER_AND_CASE,
            ),
        }
    }
}

#[async_trait]
impl Resource for VideoLibraryResource {
    type State<'a> = VideoLibraryState<'a>;
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

        match client.video_library_get(id, true).await {
            Ok(vl) => Some((VideoLibraryState::from_video_library(&vl, &state), private_state)),
            Err(err) => {
                report(diags, "could not retrieve video library", &err);
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
        state.unknown_unset(&config_state);
        state.unknown_computed();
        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
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
        if let Err(err) = check_video_library_change(&prior_state, &proposed_state) {
            diags.error_short(err.to_string(), AttributePath::new("replication_regions"));
            return None;
        }

        let mut state = proposed_state;
        state.apply_defaults(&config_state);
        if state != prior_state {
            // usage counters are refreshed by the update response
            computed_unknown(&mut state.video_count);
            computed_unknown(&mut state.traffic_usage);
            computed_unknown(&mut state.storage_usage);
            computed_unknown(&mut state.has_watermark);
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

        let options = VideoLibraryAddOptions {
            name: planned_state.name.as_str().to_owned(),
            replication_regions: set_strings(&planned_state.replication_regions),
        };
        let added = match client.video_library_add(&options).await {
            Ok(vl) => vl,
            Err(err) => {
                report(diags, "creating video library failed", &err);
                return None;
            }
        };
        let Some(id) = added.id else {
            diags.root_error(
                "creating video library failed",
                format!("the API returned no id for the video library {:?}", options.name),
            );
            return None;
        };
        info!(id, name = %options.name, "video library created");

        let state = match client
            .video_library_update(id, &planned_state.update_options())
            .await
        {
            Ok(updated) => VideoLibraryState::from_video_library(&updated, &planned_state),
            Err(err) => {
                warn!(id, "video library created but its settings were not applied");
                report(diags, "setting video library attributes via update failed", &err);
                VideoLibraryState::from_video_library(&added, &planned_state.applied_by_add())
            }
        };

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
            .video_library_update(id, &planned_state.update_options())
            .await
        {
            Ok(updated) => {
                info!(id, "video library updated");
                Some((
                    VideoLibraryState::from_video_library(&updated, &planned_state),
                    planned_private_state,
                ))
            }
            Err(err) => {
                // the prior write-only values make the next plan retry the update
                report(diags, "updating video library via API failed", &err);
                Some((prior_state, planned_private_state))
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

        match client.video_library_delete(id).await {
            Ok(()) => {
                info!(id, "video library deleted");
                Some(())
            }
            Err(err) => {
                report(diags, "could not delete video library", &err);
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

        match client.video_library_get(id, true).await {
            Ok(vl) => Some((
                VideoLibraryState::from_video_library(&vl, &Default::default()),
                Default::default(),
            )),
            Err(err) => {
                report(diags, "could not retrieve video library", &err);
                None
            }
        }
    }
}
