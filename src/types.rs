//! Core types used throughout SwapWatch
//!
//! Defines the order status lifecycle, the records exchanged with the
//! external status provider, and the in-memory tracked-order shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

/// Lifecycle status of a cross-chain swap order.
///
/// Non-terminal statuses may still change; terminal statuses never do.
/// Unknown provider strings are preserved in `Other` so a new upstream
/// state degrades to "keep polling" instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Waiting,
    Pending,
    Processing,
    Review,
    Settling,
    Settled,
    Expired,
    Refunded,
    Failed,
    Other(String),
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl OrderStatus {
    /// Parse from a provider status string (case-insensitive, total)
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "waiting" => OrderStatus::Waiting,
            "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "review" => OrderStatus::Review,
            "settling" => OrderStatus::Settling,
            "settled" => OrderStatus::Settled,
            "expired" => OrderStatus::Expired,
            "refunded" => OrderStatus::Refunded,
            "failed" => OrderStatus::Failed,
            other => OrderStatus::Other(other.to_string()),
        }
    }

    /// Whether this status can never change again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Settled
                | OrderStatus::Expired
                | OrderStatus::Refunded
                | OrderStatus::Failed
        )
    }

    /// Provider wire representation (lowercase)
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Waiting => "waiting",
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Review => "review",
            OrderStatus::Settling => "settling",
            OrderStatus::Settled => "settled",
            OrderStatus::Expired => "expired",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
            OrderStatus::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        OrderStatus::parse(&s)
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Snapshot of an order as reported by the external status provider.
///
/// `details` carries whatever else the provider returned (deposit/settle
/// coins and amounts, networks, tx hashes) opaquely; the monitor never
/// interprets it and forwards it to the notification sink for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: OrderStatus,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl StatusRecord {
    pub fn new(status: OrderStatus) -> Self {
        Self {
            status,
            details: serde_json::Value::Null,
        }
    }

    pub fn with_details(status: OrderStatus, details: serde_json::Value) -> Self {
        Self { status, details }
    }
}

/// An order under observation by the monitor
#[derive(Debug, Clone)]
pub struct TrackedOrder {
    /// Opaque external order identifier, unique registry key
    pub order_id: String,
    /// Owner identifier used only to route notifications
    pub owner_id: String,
    /// Placement time, drives the backoff age
    pub created_at: DateTime<Utc>,
    /// Most recent poll attempt; `None` = never polled
    pub last_checked_at: Option<Instant>,
    /// Last status observed (or reconciled from storage)
    pub last_known_status: OrderStatus,
}

impl TrackedOrder {
    pub fn new(order_id: String, owner_id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            order_id,
            owner_id,
            created_at,
            last_checked_at: None,
            last_known_status: OrderStatus::Pending,
        }
    }
}

/// Minimal shape the monitor needs from durable storage at reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedOrder {
    pub order_id: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        for s in ["settled", "expired", "refunded", "failed"] {
            assert!(
                OrderStatus::parse(s).is_terminal(),
                "{} should be terminal",
                s
            );
        }
        for s in ["pending", "waiting", "processing", "review", "settling"] {
            assert!(
                !OrderStatus::parse(s).is_terminal(),
                "{} should not be terminal",
                s
            );
        }
    }

    #[test]
    fn test_unknown_status_is_non_terminal_passthrough() {
        let status = OrderStatus::parse("multiple");
        assert_eq!(status, OrderStatus::Other("multiple".to_string()));
        assert!(!status.is_terminal());
        assert_eq!(status.to_string(), "multiple");
    }

    #[test]
    fn test_parse_round_trip() {
        for s in ["waiting", "pending", "processing", "settled", "refunded"] {
            assert_eq!(OrderStatus::parse(s).as_str(), s);
        }
        // Case-insensitive on the way in
        assert_eq!(OrderStatus::parse("SETTLED"), OrderStatus::Settled);
    }

    #[test]
    fn test_tracked_order_defaults() {
        let order = TrackedOrder::new("abc".into(), "user-1".into(), Utc::now());
        assert_eq!(order.last_known_status, OrderStatus::Pending);
        assert!(order.last_checked_at.is_none());
    }
}
