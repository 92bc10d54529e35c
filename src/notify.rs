//! Default notification sink
//!
//! Logs every detected transition. Hosts that deliver user-facing
//! messages (chat bots, webhooks) replace this with their own
//! `StatusChangeSink` implementation.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::monitor::StatusChangeSink;
use crate::types::{OrderStatus, StatusRecord};

/// Sink that reports transitions through the tracing pipeline
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl StatusChangeSink for LogSink {
    async fn on_status_change(
        &self,
        owner_id: &str,
        order_id: &str,
        old_status: &OrderStatus,
        new_status: &OrderStatus,
        record: &StatusRecord,
    ) -> Result<()> {
        info!(
            "Order {} for owner {} moved {} -> {} (details: {})",
            order_id, owner_id, old_status, new_status, record.details
        );
        Ok(())
    }
}
