//! Custom hostname and certificate endpoints of a pull zone

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;

/// Hostname entry embedded in a [`PullZone`](crate::PullZone)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct Hostname {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "ForceSSL", skip_serializing_if = "Option::is_none")]
    pub force_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_system_hostname: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_certificate: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddCustomHostnameOptions {
    pub hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveCustomHostnameOptions {
    pub hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetForceSslOptions {
    pub hostname: String,
    #[serde(rename = "ForceSSL")]
    pub force_ssl: bool,
}

/// Custom certificate upload
///
/// The API expects the PEM documents base64 encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddCertificateOptions {
    pub hostname: String,
    #[serde(serialize_with = "as_base64")]
    pub certificate: String,
    #[serde(serialize_with = "as_base64")]
    pub certificate_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveCertificateOptions {
    pub hostname: String,
}

fn as_base64<S: serde::Serializer>(data: &str, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data.as_bytes()))
}

impl Client {
    pub async fn hostname_add(
        &self,
        pull_zone_id: i64,
        options: &AddCustomHostnameOptions,
    ) -> Result<()> {
        let url = self.url(&format!("pullzone/{pull_zone_id}/addHostname"))?;
        self.post_no_content(url, options).await
    }

    pub async fn hostname_remove(
        &self,
        pull_zone_id: i64,
        options: &RemoveCustomHostnameOptions,
    ) -> Result<()> {
        let url = self.url(&format!("pullzone/{pull_zone_id}/removeHostname"))?;
        self.delete(url, Some(options)).await
    }

    pub async fn hostname_set_force_ssl(
        &self,
        pull_zone_id: i64,
        options: &SetForceSslOptions,
    ) -> Result<()> {
        let url = self.url(&format!("pullzone/{pull_zone_id}/setForceSSL"))?;
        self.post_no_content(url, options).await
    }

    /// Request a free certificate for `hostname`
    ///
    /// Fails with an [`ApiError`](crate::ApiError) as long as the hostname
    /// DNS record does not point to the CDN.
    pub async fn load_free_certificate(&self, hostname: &str) -> Result<()> {
        let mut url = self.url("pullzone/loadFreeCertificate")?;
        url.query_pairs_mut().append_pair("hostname", hostname);
        self.get_no_content(url).await
    }

    pub async fn certificate_add(
        &self,
        pull_zone_id: i64,
        options: &AddCertificateOptions,
    ) -> Result<()> {
        let url = self.url(&format!("pullzone/{pull_zone_id}/addCertificate"))?;
        self.post_no_content(url, options).await
    }

    pub async fn certificate_remove(
        &self,
        pull_zone_id: i64,
        options: &RemoveCertificateOptions,
    ) -> Result<()> {
        let url = self.url(&format!("pullzone/{pull_zone_id}/removeCertificate"))?;
        self.delete(url, Some(options)).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn force_ssl_uses_api_casing() {
        let options = SetForceSslOptions {
            hostname: "cdn.example.com".to_owned(),
            force_ssl: true,
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"Hostname": "cdn.example.com", "ForceSSL": true})
        );
    }

    #[test]
    fn certificate_removal_names_the_hostname() {
        let options = RemoveCertificateOptions {
            hostname: "cdn.example.com".to_owned(),
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"Hostname": "cdn.example.com"})
        );
    }

    #[test]
    fn certificate_is_base64_encoded() {
        let options = AddCertificateOptions {
            hostname: "cdn.example.com".to_owned(),
            certificate: "cert".to_owned(),
            certificate_key: "key".to_owned(),
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({
                "Hostname": "cdn.example.com",
                "Certificate": "Y2VydA==",
                "CertificateKey": "a2V5",
            })
        );
    }

    #[test]
    fn hostname_tolerates_missing_fields() {
        let hostname: Hostname = serde_json::from_str(r#"{"Id": 12}"#).unwrap();
        assert_eq!(
            hostname,
            Hostname {
                id: Some(12),
                ..Default::default()
            }
        );
    }
}
