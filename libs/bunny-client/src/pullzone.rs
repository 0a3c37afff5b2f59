//! Pull zone endpoints

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::edgerule::EdgeRule;
use crate::error::Result;
use crate::hostname::Hostname;
use crate::pagination::{paginate, Page, Pagination, DEFAULT_PAGINATION_PER_PAGE};

/// Pull zone as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct PullZone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_zone_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_library_id: Option<i64>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname_domain: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<Hostname>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edge_rules: Vec<EdgeRule>,

    #[serde(flatten)]
    pub settings: PullZoneSettings,
}

/// Mutable settings of a pull zone
///
/// Shared by [`PullZone`] responses and [`PullZoneUpdateOptions`] requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct PullZoneSettings {
    #[serde(rename = "AWSSigningEnabled", skip_serializing_if = "Option::is_none")]
    pub aws_signing_enabled: Option<bool>,
    #[serde(rename = "AWSSigningKey", skip_serializing_if = "Option::is_none")]
    pub aws_signing_key: Option<String>,
    #[serde(rename = "AWSSigningRegionName", skip_serializing_if = "Option::is_none")]
    pub aws_signing_region_name: Option<String>,
    #[serde(rename = "AWSSigningSecret", skip_serializing_if = "Option::is_none")]
    pub aws_signing_secret: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_referrers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_referrers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_ips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_redirected_countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_post_requests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_root_path_access: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control_max_age_override: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control_public_max_age_override: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_error_responses: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_cookies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_query_strings: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_avif_vary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_cache_slice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_country_code_vary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_hostname_vary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_mobile_vary: Option<bool>,
    #[serde(rename = "EnableWebPVary", skip_serializing_if = "Option::is_none")]
    pub enable_webp_vary: Option<bool>,

    #[serde(rename = "EnableGeoZoneAF", skip_serializing_if = "Option::is_none")]
    pub enable_geo_zone_af: Option<bool>,
    #[serde(rename = "EnableGeoZoneASIA", skip_serializing_if = "Option::is_none")]
    pub enable_geo_zone_asia: Option<bool>,
    #[serde(rename = "EnableGeoZoneEU", skip_serializing_if = "Option::is_none")]
    pub enable_geo_zone_eu: Option<bool>,
    #[serde(rename = "EnableGeoZoneSA", skip_serializing_if = "Option::is_none")]
    pub enable_geo_zone_sa: Option<bool>,
    #[serde(rename = "EnableGeoZoneUS", skip_serializing_if = "Option::is_none")]
    pub enable_geo_zone_us: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_logging: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_origin_shield: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_shield_zone_code: Option<String>,
    #[serde(rename = "EnableTLS1", skip_serializing_if = "Option::is_none")]
    pub enable_tls1: Option<bool>,
    #[serde(rename = "EnableTLS1_1", skip_serializing_if = "Option::is_none")]
    pub enable_tls1_1: Option<bool>,
    #[serde(rename = "VerifyOriginSSL", skip_serializing_if = "Option::is_none")]
    pub verify_origin_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_page_custom_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_page_enable_custom_code: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_page_enable_statuspage_widget: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_page_statuspage_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_page_whitelabel: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_forwarding_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_forwarding_hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_forwarding_port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_forwarding_token: Option<String>,
    #[serde(
        rename = "LoggingIPAnonymizationEnabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub logging_ip_anonymization_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_save_to_storage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_storage_zone_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perma_cache_storage_zone_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_security_enabled: Option<bool>,
    #[serde(
        rename = "ZoneSecurityIncludeHashRemoteIP",
        skip_serializing_if = "Option::is_none"
    )]
    pub zone_security_include_hash_remote_ip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_security_key: Option<String>,

    // limits
    #[serde(
        rename = "ConnectionLimitPerIPCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub connection_limit_per_ip_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_bandwidth_limit: Option<i64>,

    // safehop
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_safe_hop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_connect_timeout: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_response_timeout: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_retries: Option<i32>,
    #[serde(rename = "OriginRetry5XXResponses", skip_serializing_if = "Option::is_none")]
    pub origin_retry_5xx_responses: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_retry_connection_timeout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_retry_delay: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_retry_response_timeout: Option<bool>,

    // headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_access_control_origin_header: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_control_origin_header_extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_canonical_header: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_host_header: Option<bool>,

    // optimizer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_enabled: Option<bool>,
    #[serde(rename = "OptimizerEnableWebP", skip_serializing_if = "Option::is_none")]
    pub optimizer_enable_webp: Option<bool>,
    #[serde(rename = "OptimizerMinifyCSS", skip_serializing_if = "Option::is_none")]
    pub optimizer_minify_css: Option<bool>,
    #[serde(
        rename = "OptimizerMinifyJavaScript",
        skip_serializing_if = "Option::is_none"
    )]
    pub optimizer_minify_javascript: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_enable_manipulation_engine: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_automatic_optimization_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_desktop_max_width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_image_quality: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_mobile_max_width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_mobile_image_quality: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_watermark_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_watermark_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_watermark_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_watermark_min_image_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer_watermark_position: Option<i32>,
}

/// Fields accepted by the Add endpoint
///
/// The API only accepts this subset at creation, everything else goes through an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PullZoneAddOptions {
    pub name: String,
    pub origin_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_zone_id: Option<i64>,
    #[serde(rename = "Type")]
    pub zone_type: i32,
}

/// Body of an update request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PullZoneUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<i32>,
    #[serde(flatten)]
    pub settings: PullZoneSettings,
}

impl Client {
    pub async fn pull_zone_list(&self, pagination: Pagination) -> Result<Page<PullZone>> {
        let mut url = self.url("pullzone")?;
        url.query_pairs_mut()
            .append_pair("page", &pagination.page().to_string())
            .append_pair("per_page", &pagination.per_page().to_string());
        self.get(url).await
    }

    /// List every pull zone of the account
    pub async fn pull_zone_list_all(&self) -> Result<Vec<PullZone>> {
        paginate(DEFAULT_PAGINATION_PER_PAGE, |pagination| {
            self.pull_zone_list(pagination)
        })
        .await
    }

    pub async fn pull_zone_add(&self, options: &PullZoneAddOptions) -> Result<PullZone> {
        let url = self.url("pullzone")?;
        self.post(url, options).await
    }

    pub async fn pull_zone_get(&self, id: i64) -> Result<PullZone> {
        let url = self.url(&format!("pullzone/{id}"))?;
        self.get(url).await
    }

    /// Update the pull zone, the API answers with the updated object
    pub async fn pull_zone_update(
        &self,
        id: i64,
        options: &PullZoneUpdateOptions,
    ) -> Result<PullZone> {
        let url = self.url(&format!("pullzone/{id}"))?;
        self.post(url, options).await
    }

    pub async fn pull_zone_delete(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("pullzone/{id}"))?;
        self.delete::<()>(url, None).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_irregular_field_names() {
        let pz: PullZone = serde_json::from_str(
            r#"{
                "Id": 7,
                "Name": "pz",
                "OriginUrl": "https://origin.example",
                "Type": 1,
                "EnableGeoZoneASIA": true,
                "EnableTLS1_1": false,
                "BlockedIps": ["10.0.0.1"],
                "ConnectionLimitPerIPCount": 12,
                "OriginRetry5XXResponses": true,
                "OptimizerWatermarkOffset": 2.5,
                "Hostnames": [{"Id": 3, "Value": "pz.b-cdn.net", "ForceSSL": true}],
                "UnknownFieldFromTheFuture": 1
            }"#,
        )
        .unwrap();

        assert_eq!(pz.id, Some(7));
        assert_eq!(pz.zone_type, Some(1));
        assert_eq!(pz.settings.enable_geo_zone_asia, Some(true));
        assert_eq!(pz.settings.enable_tls1_1, Some(false));
        assert_eq!(pz.settings.blocked_ips, Some(vec!["10.0.0.1".to_owned()]));
        assert_eq!(pz.settings.connection_limit_per_ip_count, Some(12));
        assert_eq!(pz.settings.origin_retry_5xx_responses, Some(true));
        assert_eq!(pz.settings.optimizer_watermark_offset, Some(2.5));
        assert_eq!(pz.hostnames[0].force_ssl, Some(true));
    }

    #[test]
    fn update_omits_unset_fields() {
        let options = PullZoneUpdateOptions {
            origin_url: Some("https://origin.example".to_owned()),
            settings: PullZoneSettings {
                enable_tls1: Some(false),
                blocked_countries: Some(vec![]),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({
                "OriginUrl": "https://origin.example",
                "EnableTLS1": false,
                "BlockedCountries": [],
            })
        );
    }

    #[test]
    fn add_sends_type_and_skips_missing_storage_zone() {
        let options = PullZoneAddOptions {
            name: "pz".to_owned(),
            origin_url: "https://origin.example".to_owned(),
            storage_zone_id: None,
            zone_type: 0,
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"Name": "pz", "OriginUrl": "https://origin.example", "Type": 0})
        );
    }
}
