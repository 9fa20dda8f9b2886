//! `stocksync-core` — domain primitives for cross-warehouse inventory sync.
//!
//! This crate contains **pure domain** types (no IO): records, inventory
//! state, priorities, the fixed region table and configuration.

pub mod config;
pub mod error;
pub mod id;
pub mod inventory;
pub mod priority;
pub mod record;
pub mod region;

pub use config::{ConflictStrategy, SyncConfiguration};
pub use error::{ConfigError, DomainError, DomainResult};
pub use id::{BatchId, ProductId, WarehouseId};
pub use inventory::{InventoryItem, InventoryMetadata, InventoryStatus};
pub use priority::{SIGNIFICANT_PRIORITY_GAP, SyncPriority};
pub use record::{FLEXVOLT_PRODUCT_TYPE, FlexVoltCapacity, ProductSyncRecord, RecordMetadata};
pub use region::{Hemisphere, Region, WarehouseRegion, WorkingHours};
