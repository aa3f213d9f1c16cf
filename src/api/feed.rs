use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::FeedConfig;
use crate::domain::FeedRow;

const USER_AGENT: &str = concat!("venuesync/", env!("CARGO_PKG_VERSION"));

/// Result code the feed reports for a successful query
pub const RESULT_OK: &str = "INFO-000";

/// Failures that abort an ingestion run.
///
/// Malformed bodies are not errors: they are logged and the fetch yields no
/// result instead.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed API key is not configured")]
    MissingKey,
    #[error("invalid feed base URL: {0}")]
    InvalidUrl(String),
    #[error("feed request was rejected with status {0}")]
    Unauthorized(u16),
    #[error("feed server failed with status {0}")]
    Server(u16),
    #[error("failed to reach the feed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result block of the feed envelope
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResult {
    #[serde(rename = "CODE")]
    pub code: String,
    #[serde(rename = "MESSAGE", default)]
    pub message: String,
}

/// One page of the feed
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub list_total_count: u32,
    #[serde(rename = "RESULT")]
    pub result: FeedResult,
    #[serde(default)]
    pub row: Vec<FeedRow>,
}

/// Anything that can hand out feed pages by inclusive 1-based row window
pub trait FeedSource {
    fn fetch_page(&self, start: u32, end: u32) -> Result<Option<FeedResponse>, FeedError>;
}

/// Blocking HTTP client for the open-data feed
pub struct FeedClient {
    client: reqwest::blocking::Client,
    base_url: String,
    key: String,
    data_type: String,
    service: String,
}

impl FeedClient {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let key = config
            .key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(FeedError::MissingKey)?;

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            key,
            data_type: config.data_type.clone(),
            service: config.service.clone(),
        })
    }

    /// Build `{base}/{key}/{type}/{service}/{start}/{end}/`
    ///
    /// Each segment is percent-encoded on its own.
    pub fn page_url(&self, start: u32, end: u32) -> Result<Url, FeedError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| FeedError::InvalidUrl(e.to_string()))?;
        let start = start.to_string();
        let end = end.to_string();

        url.path_segments_mut()
            .map_err(|_| FeedError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend([
                self.key.as_str(),
                self.data_type.as_str(),
                self.service.as_str(),
                start.as_str(),
                end.as_str(),
                "",
            ]);

        Ok(url)
    }
}

impl FeedSource for FeedClient {
    fn fetch_page(&self, start: u32, end: u32) -> Result<Option<FeedResponse>, FeedError> {
        let url = self.page_url(start, end)?;
        tracing::debug!(service = %self.service, start, end, "requesting feed page");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if status.is_client_error() {
            return Err(FeedError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(FeedError::Server(status.as_u16()));
        }

        let body = response.text()?;
        Ok(parse_feed_body(&body, &self.service))
    }
}

/// Parse a feed body for `service`.
///
/// Returns `None` (after logging) when the body is not the expected envelope
/// or reports a non-success result code.
pub fn parse_feed_body(body: &str, service: &str) -> Option<FeedResponse> {
    let mut json: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "feed response is not valid JSON");
            return None;
        }
    };

    let Some(section) = json.get_mut(service).map(Value::take) else {
        // Errors come back as a bare top-level RESULT block
        let code = json
            .pointer("/RESULT/CODE")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let message = json
            .pointer("/RESULT/MESSAGE")
            .and_then(Value::as_str)
            .unwrap_or("");
        tracing::error!(service, code, message, "feed response has no service section");
        return None;
    };

    let response: FeedResponse = match serde_json::from_value(section) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(service, error = %e, "failed to map feed envelope");
            return None;
        }
    };

    if response.result.code != RESULT_OK {
        tracing::warn!(
            code = %response.result.code,
            message = %response.result.message,
            "feed reported a non-success result"
        );
        return None;
    }

    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "touristFoodInfo": {
            "list_total_count": 2,
            "RESULT": {"CODE": "INFO-000", "MESSAGE": "정상 처리되었습니다"},
            "row": [
                {"SEQ": "1", "SISULNAME": "Hadongkwan", "GU": "Jung-gu", "ADDR": "Myeongdong 9-gil 12", "TEL": "02-776-5656"},
                {"SEQ": 2, "SISULNAME": "Woo Lae Oak", "ADDR": "Changgyeonggung-ro 62-29", "ST1": "x"}
            ]
        }
    }"#;

    fn client(base_url: &str) -> FeedClient {
        FeedClient::new(&FeedConfig {
            base_url: base_url.to_string(),
            key: Some("my key".to_string()),
            ..FeedConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parse_feed_response() {
        let response = parse_feed_body(SAMPLE, "touristFoodInfo").unwrap();

        assert_eq!(response.list_total_count, 2);
        assert_eq!(response.result.code, RESULT_OK);
        assert_eq!(response.row.len(), 2);
        assert_eq!(response.row[0].name, "Hadongkwan");
        assert_eq!(response.row[1].seq, Some(2));
    }

    #[test]
    fn test_parse_feed_keeps_page_with_null_address() {
        let body = r#"{
            "touristFoodInfo": {
                "list_total_count": 2,
                "RESULT": {"CODE": "INFO-000", "MESSAGE": "OK"},
                "row": [
                    {"SEQ": "1", "SISULNAME": "Hadongkwan", "ADDR": "Myeongdong 9-gil 12"},
                    {"SEQ": "2", "SISULNAME": "Nameless", "ADDR": null}
                ]
            }
        }"#;
        let response = parse_feed_body(body, "touristFoodInfo").unwrap();

        assert_eq!(response.row.len(), 2);
        assert_eq!(response.row[0].address, "Myeongdong 9-gil 12");
        assert!(response.row[1].address.is_empty());
    }

    #[test]
    fn test_parse_feed_rejects_malformed_body() {
        assert!(parse_feed_body("<RESULT>oops</RESULT>", "touristFoodInfo").is_none());
        assert!(parse_feed_body(r#"{"other": {}}"#, "touristFoodInfo").is_none());
        assert!(
            parse_feed_body(
                r#"{"RESULT": {"CODE": "INFO-100", "MESSAGE": "bad key"}}"#,
                "touristFoodInfo"
            )
            .is_none()
        );
    }

    #[test]
    fn test_parse_feed_non_success_code() {
        let body = r#"{"touristFoodInfo": {"list_total_count": 0, "RESULT": {"CODE": "INFO-200", "MESSAGE": "no data"}}}"#;
        assert!(parse_feed_body(body, "touristFoodInfo").is_none());
    }

    #[test]
    fn test_page_url_encodes_segments() {
        let url = client("http://openapi.seoul.go.kr:8088").page_url(1, 5).unwrap();
        assert_eq!(
            url.as_str(),
            "http://openapi.seoul.go.kr:8088/my%20key/json/touristFoodInfo/1/5/"
        );
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let result = FeedClient::new(&FeedConfig::default());
        assert!(matches!(result, Err(FeedError::MissingKey)));
    }
}
