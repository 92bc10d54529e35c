//! Tracked-order registry
//!
//! In-memory keyed collection of orders under observation. The registry is
//! a plain map; the monitor owns it behind a mutex and is the only writer
//! once an order is tracked.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::time::Instant;

use crate::backoff::poll_interval;
use crate::types::{OrderStatus, PersistedOrder, TrackedOrder};

/// Registry of orders currently being monitored
#[derive(Debug, Default)]
pub struct OrderRegistry {
    orders: HashMap<String, TrackedOrder>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
        }
    }

    /// Start tracking an order. Idempotent: tracking an order that is
    /// already present leaves the existing entry untouched.
    ///
    /// Returns `true` if a new entry was inserted.
    pub fn track(&mut self, order_id: &str, owner_id: &str, created_at: DateTime<Utc>) -> bool {
        if self.orders.contains_key(order_id) {
            return false;
        }
        self.orders.insert(
            order_id.to_string(),
            TrackedOrder::new(order_id.to_string(), owner_id.to_string(), created_at),
        );
        true
    }

    /// Stop tracking an order. No-op when the id is absent.
    pub fn untrack(&mut self, order_id: &str) -> Option<TrackedOrder> {
        self.orders.remove(order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn order_ids(&self) -> Vec<String> {
        self.orders.keys().cloned().collect()
    }

    pub fn get(&self, order_id: &str) -> Option<&TrackedOrder> {
        self.orders.get(order_id)
    }

    /// Merge persisted non-terminal orders into the registry.
    ///
    /// Each order is tracked and its last known status overwritten with the
    /// persisted one, so a reconciled order does not fire a spurious change
    /// notification on its next poll. Terminal orders are skipped. Returns
    /// the number of orders reconciled.
    pub fn reconcile(&mut self, persisted: Vec<PersistedOrder>) -> usize {
        let mut count = 0;
        for order in persisted {
            if order.status.is_terminal() {
                continue;
            }
            self.track(&order.order_id, &order.owner_id, order.created_at);
            if let Some(entry) = self.orders.get_mut(&order.order_id) {
                entry.last_known_status = order.status;
            }
            count += 1;
        }
        count
    }

    /// Snapshot of orders due for a poll.
    ///
    /// An order is due when the time since its last check has reached the
    /// backoff interval for its age. Never-checked orders are always due.
    pub fn due_orders(&self, now: Instant, wall_now: DateTime<Utc>) -> Vec<TrackedOrder> {
        self.orders
            .values()
            .filter(|order| {
                let age = (wall_now - order.created_at).to_std().unwrap_or_default();
                let threshold = poll_interval(age);
                match order.last_checked_at {
                    None => true,
                    Some(checked) => now.saturating_duration_since(checked) >= threshold,
                }
            })
            .cloned()
            .collect()
    }

    /// Record a poll attempt (successful or not)
    pub fn mark_checked(&mut self, order_id: &str, at: Instant) {
        if let Some(order) = self.orders.get_mut(order_id) {
            order.last_checked_at = Some(at);
        }
    }

    /// Overwrite the last known status, returning the previous one.
    ///
    /// Returns `None` when the order is no longer tracked (e.g. untracked
    /// while a poll was in flight).
    pub fn record_status(&mut self, order_id: &str, status: OrderStatus) -> Option<OrderStatus> {
        self.orders
            .get_mut(order_id)
            .map(|order| std::mem::replace(&mut order.last_known_status, status))
    }
}
