//! File-backed order persistence
//!
//! Durable view of swap orders for the monitor's reconciliation and
//! write-backs: a JSON snapshot of known orders (`orders_state.json`,
//! read-modify-write) plus an append-only CSV log of observed status
//! transitions for offline analysis.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{info, warn};

use crate::monitor::OrderStore;
use crate::types::{OrderStatus, PersistedOrder};

const STATE_FILE: &str = "orders_state.json";
const TRANSITIONS_FILE: &str = "status_transitions.csv";

/// One observed status transition, as logged to CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub timestamp: i64,
    pub order_id: String,
    pub owner_id: String,
    pub old_status: String,
    pub new_status: String,
}

/// Order store over a JSON state file and a CSV transition log
pub struct FileOrderStore {
    state_path: PathBuf,
    transitions_path: PathBuf,
    orders: RwLock<HashMap<String, PersistedOrder>>,
}

impl FileOrderStore {
    /// Open (or initialize) the store under `data_dir`
    pub fn new(data_dir: &str) -> Result<Self> {
        let base = PathBuf::from(data_dir);
        fs::create_dir_all(&base)
            .with_context(|| format!("Failed to create data dir {}", base.display()))?;

        let state_path = base.join(STATE_FILE);
        let orders = if state_path.exists() {
            let raw = fs::read_to_string(&state_path)
                .with_context(|| format!("Failed to read {}", state_path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", state_path.display()))?
        } else {
            HashMap::new()
        };

        info!(
            "Order store opened at {} ({} known orders)",
            base.display(),
            orders.len()
        );

        Ok(Self {
            state_path,
            transitions_path: base.join(TRANSITIONS_FILE),
            orders: RwLock::new(orders),
        })
    }

    /// Record a newly created order. Called by the host right after the
    /// swap is placed, before the monitor starts tracking it.
    pub fn insert_order(&self, order: PersistedOrder) -> Result<()> {
        {
            let mut orders = self.orders.write().unwrap();
            orders.insert(order.order_id.clone(), order);
            self.save_locked(&orders)?;
        }
        Ok(())
    }

    /// Number of orders currently known to the store (any status)
    pub fn known_orders(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    fn save_locked(&self, orders: &HashMap<String, PersistedOrder>) -> Result<()> {
        let raw = serde_json::to_string_pretty(orders).context("Failed to serialize order state")?;
        fs::write(&self.state_path, raw)
            .with_context(|| format!("Failed to write {}", self.state_path.display()))?;
        Ok(())
    }

    fn append_transition(&self, record: &TransitionRecord) -> Result<()> {
        let write_headers = !self.transitions_path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.transitions_path)
            .with_context(|| format!("Failed to open {}", self.transitions_path.display()))?;
        let mut writer = WriterBuilder::new()
            .has_headers(write_headers)
            .from_writer(file);
        writer
            .serialize(record)
            .context("Failed to append transition record")?;
        writer.flush().context("Failed to flush transition log")?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for FileOrderStore {
    async fn update_order_status(&self, order_id: &str, status: &OrderStatus) -> Result<()> {
        let old_status = {
            let mut orders = self.orders.write().unwrap();
            let Some(order) = orders.get_mut(order_id) else {
                warn!("Status update for unknown order {}, ignoring", order_id);
                return Ok(());
            };
            let old = std::mem::replace(&mut order.status, status.clone());
            self.save_locked(&orders)?;
            old
        };

        let owner_id = self
            .orders
            .read()
            .unwrap()
            .get(order_id)
            .map(|o| o.owner_id.clone())
            .unwrap_or_default();

        self.append_transition(&TransitionRecord {
            timestamp: Utc::now().timestamp_millis(),
            order_id: order_id.to_string(),
            owner_id,
            old_status: old_status.to_string(),
            new_status: status.to_string(),
        })
    }

    async fn pending_orders(&self) -> Result<Vec<PersistedOrder>> {
        let orders = self.orders.read().unwrap();
        Ok(orders
            .values()
            .filter(|o| !o.status.is_terminal())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn temp_data_dir(test_name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "swapwatch_persistence_{}_{}",
            test_name,
            uuid::Uuid::new_v4()
        ))
    }

    fn sample_order(id: &str, status: OrderStatus) -> PersistedOrder {
        PersistedOrder {
            order_id: id.into(),
            owner_id: "user-1".into(),
            created_at: Utc::now(),
            status,
        }
    }

    #[tokio::test]
    async fn test_pending_orders_excludes_terminal() {
        let dir = temp_data_dir("pending");
        let store = FileOrderStore::new(dir.to_str().unwrap()).unwrap();
        store
            .insert_order(sample_order("o1", OrderStatus::Pending))
            .unwrap();
        store
            .insert_order(sample_order("o2", OrderStatus::Settled))
            .unwrap();

        let pending = store.pending_orders().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].order_id, "o1");

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_status_updates_survive_reopen() {
        let dir = temp_data_dir("reopen");
        {
            let store = FileOrderStore::new(dir.to_str().unwrap()).unwrap();
            store
                .insert_order(sample_order("o1", OrderStatus::Pending))
                .unwrap();
            store
                .update_order_status("o1", &OrderStatus::Processing)
                .await
                .unwrap();
        }

        let reopened = FileOrderStore::new(dir.to_str().unwrap()).unwrap();
        let pending = reopened.pending_orders().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].status, OrderStatus::Processing);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_update_unknown_order_is_non_fatal() {
        let dir = temp_data_dir("unknown");
        let store = FileOrderStore::new(dir.to_str().unwrap()).unwrap();
        store
            .update_order_status("ghost", &OrderStatus::Settled)
            .await
            .unwrap();
        assert_eq!(store.known_orders(), 0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_transition_log_appends_rows() {
        let dir = temp_data_dir("translog");
        let store = FileOrderStore::new(dir.to_str().unwrap()).unwrap();
        store
            .insert_order(sample_order("o1", OrderStatus::Pending))
            .unwrap();
        store
            .update_order_status("o1", &OrderStatus::Processing)
            .await
            .unwrap();
        store
            .update_order_status("o1", &OrderStatus::Settled)
            .await
            .unwrap();

        let log = fs::read_to_string(dir.join(TRANSITIONS_FILE)).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        // Header plus two transitions
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("pending") && lines[1].contains("processing"));
        assert!(lines[2].contains("processing") && lines[2].contains("settled"));

        let _ = fs::remove_dir_all(&dir);
    }
}
