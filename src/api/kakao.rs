use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::KakaoConfig;

const KEYWORD_SEARCH_PATH: &str = "/v2/local/search/keyword.json";
const USER_AGENT: &str = concat!("venuesync/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum MapApiError {
    #[error("Kakao API key is not configured")]
    MissingKey,
    #[error("failed to send request to Kakao Local API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Kakao Local API returned error status: {0}")]
    Status(StatusCode),
    #[error("failed to parse Kakao Local JSON response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// A place document from Kakao Local search
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub id: String,
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_group_code: Option<String>,
    #[serde(default)]
    pub address_name: Option<String>,
    /// Longitude, as a decimal string
    pub x: String,
    /// Latitude, as a decimal string
    pub y: String,
}

impl Place {
    /// Parse the document's coordinates as `(lat, lng)`.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.y.trim().parse().ok()?;
        let lng = self.x.trim().parse().ok()?;
        Some((lat, lng))
    }

    /// Category name, with Kakao's empty string treated as absent.
    pub fn category_text(&self) -> Option<&str> {
        self.category_name.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub documents: Vec<Place>,
}

/// The two map lookups enrichment relies on
pub trait PlaceLookup {
    /// Find places matching a street address.
    fn search_address(&self, address: &str) -> Result<Vec<Place>, MapApiError>;

    /// Find places called `name` around `(lat, lng)`.
    fn search_nearby(&self, name: &str, lat: f64, lng: f64) -> Result<Vec<Place>, MapApiError>;
}

/// Blocking client for Kakao Local keyword search
pub struct KakaoClient {
    client: reqwest::blocking::Client,
    base_url: String,
    authorization: String,
    radius_m: u32,
}

impl KakaoClient {
    pub fn new(config: &KakaoConfig) -> Result<Self, MapApiError> {
        let key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(MapApiError::MissingKey)?;

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: format!("KakaoAK {}", key),
            radius_m: config.radius_m,
        })
    }

    fn keyword_search(&self, query: &[(&str, String)]) -> Result<Vec<Place>, MapApiError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, KEYWORD_SEARCH_PATH))
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .query(query)
            .send()?;

        if !response.status().is_success() {
            return Err(MapApiError::Status(response.status()));
        }

        let results: SearchResponse = response.json().map_err(MapApiError::Decode)?;
        Ok(results.documents)
    }
}

impl PlaceLookup for KakaoClient {
    fn search_address(&self, address: &str) -> Result<Vec<Place>, MapApiError> {
        self.keyword_search(&[("query", address.to_string())])
    }

    fn search_nearby(&self, name: &str, lat: f64, lng: f64) -> Result<Vec<Place>, MapApiError> {
        self.keyword_search(&[
            ("query", name.to_string()),
            ("x", lng.to_string()),
            ("y", lat.to_string()),
            ("radius", self.radius_m.to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyword_response() {
        // Trimmed sample from Kakao Local keyword search
        let json = r#"{
            "documents": [{
                "id": "10332413",
                "place_name": "하동관 명동본점",
                "category_name": "음식점 > 한식 > 국밥",
                "category_group_code": "FD6",
                "address_name": "서울 중구 명동1가 10-4",
                "x": "126.985026",
                "y": "37.563414"
            }],
            "meta": {"total_count": 1}
        }"#;
        let results: SearchResponse = serde_json::from_str(json).unwrap();

        assert_eq!(results.documents.len(), 1);
        let place = &results.documents[0];
        assert_eq!(place.category_group_code.as_deref(), Some("FD6"));
        let (lat, lng) = place.coordinates().unwrap();
        assert!((lat - 37.563414).abs() < 1e-9);
        assert!((lng - 126.985026).abs() < 1e-9);
    }

    #[test]
    fn test_empty_category_text_is_absent() {
        let place: Place = serde_json::from_str(
            r#"{"id": "1", "category_name": "", "category_group_code": "", "x": "bad", "y": "37.5"}"#,
        )
        .unwrap();

        assert!(place.category_text().is_none());
        assert!(place.coordinates().is_none());
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let result = KakaoClient::new(&KakaoConfig::default());
        assert!(matches!(result, Err(MapApiError::MissingKey)));
    }
}
