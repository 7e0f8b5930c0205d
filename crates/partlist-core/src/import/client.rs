use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::PartlistError;
use crate::import::payload::Payload;

/// Status and body of an API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_created(&self) -> bool {
        matches!(self.status, 200 | 201)
    }

    /// The `id` of the created resource, when the body is a JSON object
    /// carrying one.
    pub fn created_id(&self) -> Option<Value> {
        let body: Value = serde_json::from_str(&self.body).ok()?;
        body.get("id").filter(|id| !id.is_null()).cloned()
    }
}

/// The inventory API operations the importer needs.
pub trait PartsApi {
    /// Check the parts endpoint. Returns the HTTP status on any response.
    fn health_check(&self) -> Result<u16, PartlistError>;

    /// Submit one part. Non-2xx statuses are returned, not raised.
    fn create_part(&self, payload: &Payload) -> Result<ApiResponse, PartlistError>;

    /// Book a stock movement for an existing part.
    fn create_stock_movement(&self, payload: &Payload) -> Result<ApiResponse, PartlistError>;

    /// Human-readable location used in messages.
    fn base_url(&self) -> &str;
}

/// `PartsApi` over HTTP with a blocking client.
pub struct HttpPartsApi {
    client: Client,
    base_url: String,
    submit_timeout: Duration,
    health_timeout: Duration,
}

impl HttpPartsApi {
    pub fn new(config: &ApiConfig) -> Result<Self, PartlistError> {
        let client = Client::builder()
            .user_agent(concat!("partlist/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            submit_timeout: config.submit_timeout(),
            health_timeout: config.health_timeout(),
        })
    }

    fn parts_url(&self) -> String {
        format!("{}/parts", self.base_url)
    }

    fn post(&self, url: String, payload: &Payload) -> Result<ApiResponse, PartlistError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .timeout(self.submit_timeout)
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(ApiResponse { status, body })
    }
}

impl PartsApi for HttpPartsApi {
    fn health_check(&self) -> Result<u16, PartlistError> {
        let response = self
            .client
            .get(self.parts_url())
            .query(&[("limit", "1")])
            .timeout(self.health_timeout)
            .send()?;
        Ok(response.status().as_u16())
    }

    fn create_part(&self, payload: &Payload) -> Result<ApiResponse, PartlistError> {
        self.post(self.parts_url(), payload)
    }

    fn create_stock_movement(&self, payload: &Payload) -> Result<ApiResponse, PartlistError> {
        self.post(format!("{}/inventory/stock-movements", self.base_url), payload)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
