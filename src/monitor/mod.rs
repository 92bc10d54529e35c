//! Order Status Monitor
//!
//! Long-running tracker for outstanding cross-chain swap orders:
//! - **Tick loop**: a fixed-cadence timer selects orders due for a poll
//!   per the age-adaptive backoff schedule
//! - **Bounded fan-out**: concurrently in-flight polls are capped by a
//!   semaphore; excess due orders are deferred to the next tick
//! - **Transition handling**: detected changes are written through to
//!   storage and pushed to the notification sink exactly once
//! - **Reconciliation**: on startup the registry is rebuilt from orders
//!   persisted as non-terminal
//!
//! Failures degrade to "no progress on one order this tick"; nothing in
//! this module is fatal to the host.

pub mod traits;

pub use traits::{OrderStore, StatusChangeSink, StatusProvider};

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::registry::OrderRegistry;
use crate::types::TrackedOrder;

/// Background monitor for asynchronous swap orders.
///
/// All external effects (status fetch, persistence, notification) go
/// through the injected trait objects; the monitor itself only owns the
/// registry and the tick task.
pub struct OrderMonitor {
    inner: Arc<MonitorInner>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

struct MonitorInner {
    registry: Mutex<OrderRegistry>,
    provider: Arc<dyn StatusProvider>,
    store: Arc<dyn OrderStore>,
    sink: Arc<dyn StatusChangeSink>,
    /// Admission gate for in-flight polls, shared across ticks
    poll_gate: Arc<Semaphore>,
    config: MonitorConfig,
    running: AtomicBool,
}

impl OrderMonitor {
    pub fn new(
        config: MonitorConfig,
        provider: Arc<dyn StatusProvider>,
        store: Arc<dyn OrderStore>,
        sink: Arc<dyn StatusChangeSink>,
    ) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                registry: Mutex::new(OrderRegistry::new()),
                provider,
                store,
                sink,
                poll_gate: Arc::new(Semaphore::new(config.max_concurrent_polls)),
                config,
                running: AtomicBool::new(false),
            }),
            tick_task: Mutex::new(None),
        }
    }

    /// Begin the tick loop. Idempotent: calling while running is a no-op.
    pub fn start(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            debug!("Monitor already running, ignoring start()");
            return;
        }
        let inner = Arc::clone(&self.inner);
        let tick_every = Duration::from_secs(self.inner.config.tick_interval_secs);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(tick_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(
                "Order status monitor started (tick every {}s, max {} concurrent polls)",
                inner.config.tick_interval_secs, inner.config.max_concurrent_polls
            );
            loop {
                ticker.tick().await;
                if !inner.running.load(Ordering::SeqCst) {
                    break;
                }
                Arc::clone(&inner).run_tick().await;
            }
        });
        *self.tick_task.lock().unwrap() = Some(handle);
    }

    /// Stop the tick loop. Idempotent.
    ///
    /// Soft stop: the timer is cancelled immediately, but polls already in
    /// flight run to completion and may still update the registry and fire
    /// notifications.
    pub fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.tick_task.lock().unwrap().take() {
            handle.abort();
        }
        info!("Order status monitor stopped");
    }

    /// Register a freshly placed order for observation.
    ///
    /// Idempotent on `order_id`. `created_at` defaults to now; pass the
    /// original placement time when re-tracking an older order.
    pub fn track_order(&self, order_id: &str, owner_id: &str, created_at: Option<DateTime<Utc>>) {
        let created_at = created_at.unwrap_or_else(Utc::now);
        let inserted = self
            .inner
            .registry
            .lock()
            .unwrap()
            .track(order_id, owner_id, created_at);
        if inserted {
            info!("Tracking order {} for owner {}", order_id, owner_id);
        } else {
            debug!("Order {} already tracked, ignoring", order_id);
        }
    }

    /// Drop an order from observation (e.g. user cancellation). No-op when
    /// the id is unknown.
    pub fn untrack_order(&self, order_id: &str) {
        if self
            .inner
            .registry
            .lock()
            .unwrap()
            .untrack(order_id)
            .is_some()
        {
            info!("Untracked order {}", order_id);
        }
    }

    /// Rebuild the registry from orders persisted as non-terminal.
    ///
    /// Normally called once at process startup, before `start()`. A storage
    /// failure degrades to an empty (or partially reconciled) registry and
    /// is never fatal. Returns the number of orders reconciled.
    pub async fn load_pending_orders(&self) -> usize {
        match self.inner.store.pending_orders().await {
            Ok(persisted) => {
                let count = self.inner.registry.lock().unwrap().reconcile(persisted);
                info!("Reconciled {} pending orders from storage", count);
                count
            }
            Err(e) => {
                warn!("Could not load pending orders, starting empty: {e:#}");
                0
            }
        }
    }

    pub fn tracked_count(&self) -> usize {
        self.inner.registry.lock().unwrap().len()
    }

    pub fn tracked_order_ids(&self) -> Vec<String> {
        self.inner.registry.lock().unwrap().order_ids()
    }
}

impl MonitorInner {
    /// One scheduler tick: select due orders and poll them under the
    /// concurrency cap, awaiting the whole batch.
    async fn run_tick(self: Arc<Self>) {
        let now = Instant::now();
        let wall_now = Utc::now();
        let due = self.registry.lock().unwrap().due_orders(now, wall_now);
        if due.is_empty() {
            return;
        }
        debug!("Tick: {} order(s) due for polling", due.len());

        let mut polls = Vec::with_capacity(due.len());
        let mut deferred = 0usize;
        for order in due {
            // Admission gate, not a queue: when no permit is free the order
            // stays due and is re-evaluated next tick.
            match Arc::clone(&self.poll_gate).try_acquire_owned() {
                Ok(permit) => {
                    let inner = Arc::clone(&self);
                    polls.push(tokio::spawn(async move {
                        let _permit = permit;
                        inner.poll_order(order).await;
                    }));
                }
                Err(_) => deferred += 1,
            }
        }
        if deferred > 0 {
            debug!(
                "Concurrency cap reached, deferring {} order(s) to next tick",
                deferred
            );
        }
        // Await the batch; one order's failure never blocks the others
        for poll in polls {
            if let Err(e) = poll.await {
                error!("Poll task panicked or was cancelled: {e}");
            }
        }
    }

    /// Poll a single order: fetch, compare, and on change persist + notify,
    /// untracking when the new status is terminal.
    async fn poll_order(&self, order: TrackedOrder) {
        let fetched = self.provider.order_status(&order.order_id).await;

        // The attempt counts against the backoff schedule whether or not
        // the fetch succeeded.
        self.registry
            .lock()
            .unwrap()
            .mark_checked(&order.order_id, Instant::now());

        let record = match fetched {
            Ok(record) => record,
            Err(e) => {
                // Transient: stay tracked, retry at the same cadence
                warn!("Status poll for order {} failed: {e:#}", order.order_id);
                return;
            }
        };

        let new_status = record.status.clone();
        // Re-read under the lock: the order may have been untracked or
        // updated by an overlapping poll while the fetch was in flight.
        let old_status = {
            let mut registry = self.registry.lock().unwrap();
            let current = match registry.get(&order.order_id) {
                None => return,
                Some(entry) => entry.last_known_status.clone(),
            };
            if current == new_status {
                return;
            }
            registry.record_status(&order.order_id, new_status.clone());
            current
        };

        info!(
            "Order {} ({}): {} -> {}",
            order.order_id, order.owner_id, old_status, new_status
        );

        if let Err(e) = self
            .store
            .update_order_status(&order.order_id, &new_status)
            .await
        {
            // In-memory state stays authoritative; the next detected
            // transition writes again once storage recovers.
            error!(
                "Failed to persist status change for order {}: {e:#}",
                order.order_id
            );
        }

        if let Err(e) = self
            .sink
            .on_status_change(
                &order.owner_id,
                &order.order_id,
                &old_status,
                &new_status,
                &record,
            )
            .await
        {
            // Not retried; the transition still counts as processed
            error!(
                "Status change notification for order {} failed: {e:#}",
                order.order_id
            );
        }

        if new_status.is_terminal() {
            self.registry.lock().unwrap().untrack(&order.order_id);
            info!(
                "Order {} reached terminal status {}, no longer tracked",
                order.order_id, new_status
            );
        }
    }
}
