//! Warehouse-side inventory state, as read from the inventory store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::priority::SyncPriority;

/// Stock level classification of an inventory item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    InStock,
    LowStock,
    OutOfStock,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<SyncPriority>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Current state of one product in one warehouse.
///
/// Owned by the external inventory store; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub product_id: String,
    pub quantity: i64,
    pub status: InventoryStatus,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub metadata: InventoryMetadata,
}

impl InventoryItem {
    pub fn new(
        product_id: impl Into<String>,
        quantity: i64,
        status: InventoryStatus,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            status,
            last_updated,
            metadata: InventoryMetadata::default(),
        }
    }

    pub fn with_priority(mut self, priority: SyncPriority) -> Self {
        self.metadata.priority = Some(priority);
        self
    }

    /// Priority recorded on the item, MEDIUM when absent.
    pub fn priority(&self) -> SyncPriority {
        self.metadata.priority.unwrap_or_default()
    }
}
