//! Storage zone endpoints

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct StorageZone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_used: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_stored: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replication_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    #[serde(
        rename = "Custom404FilePath",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_404_file_path: Option<String>,
    #[serde(rename = "Rewrite404To200", skip_serializing_if = "Option::is_none")]
    pub rewrite_404_to_200: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageZoneAddOptions {
    pub name: String,
    pub region: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replication_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
}

/// Body of an update request
///
/// Replication regions are always sent, the API only adds the listed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageZoneUpdateOptions {
    pub replication_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,
    #[serde(
        rename = "Custom404FilePath",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_404_file_path: Option<String>,
    #[serde(rename = "Rewrite404To200", skip_serializing_if = "Option::is_none")]
    pub rewrite_404_to_200: Option<bool>,
}

impl Client {
    pub async fn storage_zone_add(&self, options: &StorageZoneAddOptions) -> Result<StorageZone> {
        let url = self.url("storagezone")?;
        self.post(url, options).await
    }

    pub async fn storage_zone_get(&self, id: i64) -> Result<StorageZone> {
        let url = self.url(&format!("storagezone/{id}"))?;
        self.get(url).await
    }

    /// Update the storage zone
    ///
    /// The API answers without a body, fetch the zone again to observe the result.
    pub async fn storage_zone_update(
        &self,
        id: i64,
        options: &StorageZoneUpdateOptions,
    ) -> Result<()> {
        let url = self.url(&format!("storagezone/{id}"))?;
        self.post_no_content(url, options).await
    }

    pub async fn storage_zone_delete(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("storagezone/{id}"))?;
        self.delete::<()>(url, None).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_get_response() {
        let sz: StorageZone = serde_json::from_str(
            r#"{
                "Id": 5,
                "UserId": "u-1",
                "Name": "assets",
                "Password": "pw",
                "Region": "DE",
                "ReplicationRegions": ["NY", "SG"],
                "StorageUsed": 1024,
                "FilesStored": 3,
                "Deleted": false
            }"#,
        )
        .unwrap();

        assert_eq!(sz.id, Some(5));
        assert_eq!(sz.replication_regions, vec!["NY", "SG"]);
        assert_eq!(sz.storage_used, Some(1024));
        assert_eq!(sz.custom_404_file_path, None);
    }

    #[test]
    fn update_always_sends_replication_regions() {
        let options = StorageZoneUpdateOptions {
            rewrite_404_to_200: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"ReplicationRegions": [], "Rewrite404To200": true})
        );
    }
}
