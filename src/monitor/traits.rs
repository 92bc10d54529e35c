//! Injected capability boundary for the monitor
//!
//! The monitor consumes exactly these external capabilities, provided at
//! construction. Concrete bindings live elsewhere (`crate::sideshift` for
//! the provider, `crate::persistence` for the store, `crate::notify` for
//! the sink); hosts swap in their own implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{OrderStatus, PersistedOrder, StatusRecord};

/// Source of truth for the current status of a swap order
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Fetch the current status of one order. Fails on network or
    /// provider errors; the monitor treats failures as transient.
    async fn order_status(&self, order_id: &str) -> Result<StatusRecord>;
}

/// Durable storage view of orders, used for reconciliation and write-backs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Best-effort write of a detected status change
    async fn update_order_status(&self, order_id: &str, status: &OrderStatus) -> Result<()>;

    /// All orders not yet in a terminal state
    async fn pending_orders(&self) -> Result<Vec<PersistedOrder>>;
}

/// Callback invoked once per detected status transition
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusChangeSink: Send + Sync {
    /// Failures are logged, never retried; the transition still counts as
    /// processed for registry purposes.
    async fn on_status_change(
        &self,
        owner_id: &str,
        order_id: &str,
        old_status: &OrderStatus,
        new_status: &OrderStatus,
        record: &StatusRecord,
    ) -> Result<()>;
}
