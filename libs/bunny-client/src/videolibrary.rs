//! Video library endpoints

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct VideoLibrary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_usage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_usage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replication_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only_api_key: Option<String>,
    /// Only present when requested with `include_access_key`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_watermark: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_zone_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_zone_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_zone_type: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_referrers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocked_referrers: Vec<String>,

    #[serde(flatten)]
    pub settings: VideoLibrarySettings,
}

/// Settings that can be changed through an update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct VideoLibrarySettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark_position_left: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark_position_top: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark_width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark_height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_resolutions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vi_ai_publisher_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vast_tag_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captions_font_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captions_font_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captions_background: Option<String>,
    #[serde(rename = "UILanguage", skip_serializing_if = "Option::is_none")]
    pub ui_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_early_play: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_token_authentication_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_none_referrer: Option<bool>,
    #[serde(rename = "EnableMP4Fallback", skip_serializing_if = "Option::is_none")]
    pub enable_mp4_fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_original_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_direct_play: Option<bool>,
    #[serde(rename = "EnableDRM", skip_serializing_if = "Option::is_none")]
    pub enable_drm: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_240p: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_360p: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_480p: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_720p: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_1080p: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_1440p: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_2160p: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_heatmap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_content_tagging: Option<bool>,
    #[serde(rename = "CustomHTML", skip_serializing_if = "Option::is_none")]
    pub custom_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_key_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoLibraryAddOptions {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replication_regions: Vec<String>,
}

/// Body of an update request
///
/// The token fields are accepted by the API but never returned by it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VideoLibraryUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_token_authentication: Option<bool>,
    #[serde(
        rename = "EnableTokenIPVerification",
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_token_ip_verification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<bool>,
    #[serde(flatten)]
    pub settings: VideoLibrarySettings,
}

impl Client {
    pub async fn video_library_add(
        &self,
        options: &VideoLibraryAddOptions,
    ) -> Result<VideoLibrary> {
        let url = self.url("videolibrary")?;
        self.post(url, options).await
    }

    pub async fn video_library_get(
        &self,
        id: i64,
        include_access_key: bool,
    ) -> Result<VideoLibrary> {
        let mut url = self.url(&format!("videolibrary/{id}"))?;
        url.query_pairs_mut()
            .append_pair("includeAccessKey", if include_access_key { "true" } else { "false" });
        self.get(url).await
    }

    pub async fn video_library_update(
        &self,
        id: i64,
        options: &VideoLibraryUpdateOptions,
    ) -> Result<VideoLibrary> {
        let url = self.url(&format!("videolibrary/{id}"))?;
        self.post(url, options).await
    }

    pub async fn video_library_delete(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("videolibrary/{id}"))?;
        self.delete::<()>(url, None).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_irregular_field_names() {
        let vl: VideoLibrary = serde_json::from_str(
            r#"{
                "Id": 9,
                "Name": "videos",
                "ApiKey": "k",
                "ReplicationRegions": ["UK"],
                "UILanguage": "de",
                "EnableMP4Fallback": true,
                "EnableDRM": false,
                "CustomHTML": "<b>",
                "Bitrate2160p": 25000,
                "PullZoneType": 1
            }"#,
        )
        .unwrap();

        assert_eq!(vl.id, Some(9));
        assert_eq!(vl.api_key.as_deref(), Some("k"));
        assert_eq!(vl.settings.ui_language.as_deref(), Some("de"));
        assert_eq!(vl.settings.enable_mp4_fallback, Some(true));
        assert_eq!(vl.settings.enable_drm, Some(false));
        assert_eq!(vl.settings.custom_html.as_deref(), Some("<b>"));
        assert_eq!(vl.settings.bitrate_2160p, Some(25000));
        assert_eq!(vl.pull_zone_type, Some(1));
    }

    #[test]
    fn update_carries_token_fields() {
        let options = VideoLibraryUpdateOptions {
            enable_token_ip_verification: Some(true),
            settings: VideoLibrarySettings {
                font_family: Some("Rubik".to_owned()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"EnableTokenIPVerification": true, "FontFamily": "Rubik"})
        );
    }
}
