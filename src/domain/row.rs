use serde::{Deserialize, Deserializer};

use super::store::Store;

/// One venue record from the open-data feed.
///
/// The uppercase fields come straight from the feed. The remaining fields
/// start empty and are filled in by enrichment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedRow {
    #[serde(rename = "SEQ", default, deserialize_with = "number_or_string")]
    pub seq: Option<i64>,
    #[serde(rename = "SISULNAME", default, deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(rename = "GU", default)]
    pub district: Option<String>,
    #[serde(rename = "ADDR", default, deserialize_with = "string_or_null")]
    pub address: String,
    #[serde(rename = "TEL", default)]
    pub phone: Option<String>,
    #[serde(rename = "HOMEPAGE", default)]
    pub homepage: Option<String>,

    #[serde(skip)]
    pub latitude: Option<f64>,
    #[serde(skip)]
    pub longitude: Option<f64>,
    #[serde(skip)]
    pub category: Option<String>,
    #[serde(skip)]
    pub store_id: Option<String>,
}

impl FeedRow {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            ..Self::default()
        }
    }

    /// Whether every field a store needs is present.
    pub fn is_persistable(&self) -> bool {
        self.latitude.is_some()
            && self.longitude.is_some()
            && self.category.is_some()
            && self.store_id.is_some()
    }

    /// Build the store this row describes.
    ///
    /// Returns `None` for rows that are not persistable or whose identifier
    /// is not an integer.
    pub fn to_store(&self) -> Option<Store> {
        let id = self.store_id.as_deref()?.trim().parse::<i64>().ok()?;

        Some(Store {
            id,
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone().filter(|p| !p.trim().is_empty()),
            latitude: self.latitude?,
            longitude: self.longitude?,
            category: self.category.clone()?,
            bookmark_count: 0,
        })
    }
}

/// The feed serializes numbers inconsistently, sometimes `1` and sometimes `"1"`.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}

/// A `null` text field reads as empty, so one sparse row cannot sink the page.
fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
