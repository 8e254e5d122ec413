//! CME Group volume report fetcher
//!
//! Fetches the per-strike options volume report for COMEX gold (product 192)
//! from CME Group's public website API. The endpoint filters obvious bots, so
//! requests carry a desktop browser User-Agent and the product page Referer.
//!
//! Note: This is for personal/research use. The report is published for the
//! previous trade date.

use chrono::{Duration, NaiveDate};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{ExpirationCode, GoldError, GoldResult};

/// Request settings for the volume report endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Report endpoint
    pub base_url: String,
    /// CME product id (192 = COMEX gold options)
    pub product_id: String,
    /// Report type; CME has been seen to change this
    pub report_type: String,
    pub user_agent: String,
    pub referer: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.cmegroup.com/CmeWS/mvc/Volume/Options/Details".to_string(),
            product_id: "192".to_string(),
            report_type: "P".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            referer: "https://www.cmegroup.com/markets/metals/precious/gold.volume.options.html"
                .to_string(),
        }
    }
}

/// CME volume report client
pub struct CmeClient {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl CmeClient {
    pub fn new() -> GoldResult<Self> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> GoldResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(REFERER, header_value(&config.referer)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GoldError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Query string for one report request
    pub fn query_params(
        &self,
        expiration: &ExpirationCode,
        trade_date: NaiveDate,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("productid", self.config.product_id.clone()),
            ("tradedate", format_trade_date(trade_date)),
            ("expirationcode", expiration.to_string()),
            ("reporttype", self.config.report_type.clone()),
        ]
    }

    /// Fetch the raw volume report for one expiration month
    pub fn fetch_option_data(
        &self,
        expiration: &ExpirationCode,
        trade_date: NaiveDate,
    ) -> GoldResult<Value> {
        let params = self.query_params(expiration, trade_date);
        tracing::info!(
            "Requesting {} volume report for {} (trade date {})",
            self.config.product_id,
            expiration,
            format_trade_date(trade_date)
        );

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .map_err(|e| GoldError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| GoldError::Network(format!("Failed to read response: {}", e)))?;

        parse_response(status, &body)
    }
}

fn header_value(value: &str) -> GoldResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| GoldError::invalid_input(format!("Bad header value {:?}: {}", value, e)))
}

/// Interpret a report response: only HTTP 200 with a non-empty JSON body counts
pub fn parse_response(status: u16, body: &str) -> GoldResult<Value> {
    if status != 200 {
        tracing::warn!("Request failed: HTTP {}", status);
        return Err(GoldError::Http { status });
    }

    let payload: Value = serde_json::from_str(body)
        .map_err(|e| GoldError::data(format!("Failed to parse report: {}", e)))?;

    if is_empty_payload(&payload) {
        return Err(GoldError::EmptyResponse);
    }

    Ok(payload)
}

/// `null`, `{}`, `[]`, `""` and `false` carry no data
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// The report is published for the day before `today`
pub fn previous_trade_date(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

/// CME date parameter format (`YYYYMMDD`)
pub fn format_trade_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Parse a `YYYYMMDD` trade date override
pub fn parse_trade_date(raw: &str) -> GoldResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y%m%d")
        .map_err(|e| GoldError::invalid_input(format!("Bad trade date {:?}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn august_25() -> ExpirationCode {
        ExpirationCode::from_year_month("202508").unwrap()
    }

    #[test]
    fn test_query_params() {
        let client = CmeClient::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        let params = client.query_params(&august_25(), date);

        assert_eq!(
            params,
            vec![
                ("productid", "192".to_string()),
                ("tradedate", "20250714".to_string()),
                ("expirationcode", "Q25".to_string()),
                ("reporttype", "P".to_string()),
            ]
        );
    }

    #[test]
    fn test_previous_trade_date() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(format_trade_date(previous_trade_date(today)), "20250228");

        let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(format_trade_date(previous_trade_date(new_year)), "20251231");
    }

    #[test]
    fn test_parse_trade_date() {
        assert_eq!(
            parse_trade_date("20250714").unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
        );
        assert!(parse_trade_date("2025-07-14").is_err());
    }

    #[test]
    fn test_parse_response_ok() {
        let payload = parse_response(200, r#"{"monthData": []}"#).unwrap();
        assert!(payload.get("monthData").is_some());
    }

    #[test]
    fn test_parse_response_status() {
        assert!(matches!(
            parse_response(403, "<html>denied</html>"),
            Err(GoldError::Http { status: 403 })
        ));
    }

    #[test]
    fn test_parse_response_empty_or_garbled() {
        assert!(matches!(parse_response(200, "{}"), Err(GoldError::EmptyResponse)));
        assert!(matches!(parse_response(200, "null"), Err(GoldError::EmptyResponse)));
        assert!(matches!(parse_response(200, "[]"), Err(GoldError::EmptyResponse)));
        assert!(matches!(parse_response(200, "<html>"), Err(GoldError::Data(_))));
    }

    #[test]
    #[ignore] // Requires network
    fn test_fetch_live_report() {
        let client = CmeClient::new().unwrap();
        let today = chrono::Local::now().date_naive();
        let expiry = today + Duration::days(60);
        let code = ExpirationCode::from_year_month(&expiry.format("%Y%m").to_string()).unwrap();

        match client.fetch_option_data(&code, previous_trade_date(today)) {
            Ok(payload) => println!("Report keys: {:?}", payload.as_object().map(|m| m.len())),
            Err(e) => println!("Fetch failed (bot filter or closed market?): {}", e),
        }
    }
}
