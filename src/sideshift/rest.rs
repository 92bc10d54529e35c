//! SideShift REST API client
//!
//! Handles HTTP communication with the SideShift v2 API. The monitor only
//! needs the shift-status lookup; quote and shift creation stay with the
//! host application.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::types::{ProviderError, Shift};
use crate::config::ProviderConfig;
use crate::monitor::StatusProvider;
use crate::types::{OrderStatus, StatusRecord};

/// REST client for the SideShift v2 API
pub struct SideShiftClient {
    client: Client,
    base_url: String,
    affiliate_id: Option<String>,
    api_secret: Option<String>,
}

impl SideShiftClient {
    /// Create a new REST client from provider configuration
    pub fn new(config: &ProviderConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            affiliate_id: config
                .affiliate_id
                .clone()
                .or_else(|| Self::resolve_env(&["SIDESHIFT_AFFILIATE_ID"])),
            api_secret: config
                .api_secret
                .clone()
                .or_else(|| Self::resolve_env(&["SIDESHIFT_SECRET", "SIDESHIFT_API_SECRET"])),
        }
    }

    fn resolve_env(var_names: &[&str]) -> Option<String> {
        for var in var_names {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Fetch one shift by id, returning the typed shift and the raw payload
    pub async fn get_shift(&self, shift_id: &str) -> Result<(Shift, Value), ProviderError> {
        let url = format!("{}/shifts/{}", self.base_url, shift_id);
        let mut request = self.client.get(&url);
        if let Some(secret) = &self.api_secret {
            request = request.header("x-sideshift-secret", secret);
        }
        if let Some(affiliate) = &self.affiliate_id {
            request = request.query(&[("affiliateId", affiliate)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let payload: Value = response.json().await?;
        let shift: Shift = serde_json::from_value(payload.clone())?;
        debug!(
            "Fetched shift {} ({}): status={}",
            shift.id,
            shift.pair(),
            shift.status
        );
        Ok((shift, payload))
    }
}

#[async_trait]
impl StatusProvider for SideShiftClient {
    async fn order_status(&self, order_id: &str) -> anyhow::Result<StatusRecord> {
        let (shift, payload) = self.get_shift(order_id).await?;
        Ok(StatusRecord::with_details(
            OrderStatus::parse(&shift.status),
            payload,
        ))
    }
}
