//! SideShift API response types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the provider client
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Provider returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A shift (swap order) as returned by `GET /v2/shifts/{id}`.
///
/// Only the fields the monitor and its logs care about are typed; the
/// full payload travels alongside as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub deposit_coin: Option<String>,
    #[serde(default)]
    pub deposit_network: Option<String>,
    #[serde(default)]
    pub settle_coin: Option<String>,
    #[serde(default)]
    pub settle_network: Option<String>,
    #[serde(default)]
    pub deposit_amount: Option<Decimal>,
    #[serde(default)]
    pub settle_amount: Option<Decimal>,
    #[serde(default)]
    pub deposit_address: Option<String>,
    #[serde(default)]
    pub settle_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Shift {
    /// Short human-readable pair description for logs, e.g. "btc -> xmr"
    pub fn pair(&self) -> String {
        format!(
            "{} -> {}",
            self.deposit_coin.as_deref().unwrap_or("?"),
            self.settle_coin.as_deref().unwrap_or("?")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_deserializes_from_api_payload() {
        let payload = r#"{
            "id": "abc123def456",
            "createdAt": "2026-08-20T10:15:00Z",
            "depositCoin": "BTC",
            "settleCoin": "XMR",
            "depositNetwork": "bitcoin",
            "settleNetwork": "monero",
            "depositAddress": "bc1qexample",
            "settleAddress": "4Aexample",
            "depositAmount": "0.015",
            "settleAmount": "3.2145",
            "expiresAt": "2026-08-20T10:45:00Z",
            "status": "processing",
            "type": "fixed",
            "averageShiftSeconds": "120"
        }"#;
        let shift: Shift = serde_json::from_str(payload).unwrap();
        assert_eq!(shift.id, "abc123def456");
        assert_eq!(shift.status, "processing");
        assert_eq!(shift.pair(), "BTC -> XMR");
        assert_eq!(shift.deposit_amount.unwrap().to_string(), "0.015");
    }

    #[test]
    fn test_shift_tolerates_missing_optional_fields() {
        let shift: Shift = serde_json::from_str(r#"{"id": "x", "status": "waiting"}"#).unwrap();
        assert_eq!(shift.pair(), "? -> ?");
        assert!(shift.settle_amount.is_none());
    }
}
