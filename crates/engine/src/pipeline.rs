//! End-to-end planning for one sync cycle: validate → score → plan.
//!
//! The engine never touches storage. Current inventory is read through
//! [`InventoryLookup`], which the persistence collaborator implements.

use std::collections::HashMap;
use std::hash::BuildHasher;

use chrono::{DateTime, Utc};
use serde::Serialize;

use stocksync_core::{InventoryItem, ProductSyncRecord, Region, SyncConfiguration, WarehouseId};

use crate::batch::{self, SyncBatch};
use crate::priority;
use crate::scheduler::{self, ScheduledSync};
use crate::validator::{self, SyncValidationResult};

/// Read access to warehouse-side inventory state.
pub trait InventoryLookup {
    fn current(&self, product_id: &str, warehouse_id: &WarehouseId) -> Option<InventoryItem>;
}

impl<S: BuildHasher> InventoryLookup for HashMap<(String, WarehouseId), InventoryItem, S> {
    fn current(&self, product_id: &str, warehouse_id: &WarehouseId) -> Option<InventoryItem> {
        self.get(&(product_id.to_string(), warehouse_id.clone())).cloned()
    }
}

/// Lookup that knows nothing; every record is scored without inventory context.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoInventory;

impl InventoryLookup for NoInventory {
    fn current(&self, _product_id: &str, _warehouse_id: &WarehouseId) -> Option<InventoryItem> {
        None
    }
}

/// Output of [`prepare`]: the validation report and the batches to dispatch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPlan {
    pub target_warehouse: WarehouseId,
    pub target_region: Region,
    pub validation: SyncValidationResult,
    pub batches: Vec<SyncBatch>,
}

impl SyncPlan {
    pub fn total_products(&self) -> usize {
        self.batches.iter().map(SyncBatch::len).sum()
    }

    pub fn estimated_duration_ms(&self) -> u64 {
        self.batches.iter().map(|b| b.estimated_duration_ms).sum()
    }
}

/// Validate `records`, score the valid ones against `target`'s inventory and
/// pack them into batches.
///
/// Scored priorities are written into each record's `metadata.priority` on
/// the copies placed in the batches; the inputs are left untouched.
pub fn prepare<L: InventoryLookup + ?Sized>(
    records: &[ProductSyncRecord],
    target: &WarehouseId,
    inventory: &L,
    config: &SyncConfiguration,
    now: DateTime<Utc>,
) -> SyncPlan {
    let region = Region::for_warehouse(target.as_str());
    let validation = validator::validate(records, now);

    let scored: Vec<ProductSyncRecord> = validation
        .valid_records
        .iter()
        .map(|record| {
            let current = inventory.current(&record.product_id, target);
            let priority =
                priority::calculate_with_config(record, region, current.as_ref(), config, now);
            record.clone().with_priority(priority)
        })
        .collect();

    let batches = batch::plan(&scored, config);

    tracing::info!(
        target = %target,
        %region,
        valid = validation.summary.valid,
        invalid = validation.summary.invalid,
        batches = batches.len(),
        "prepared sync plan"
    );

    SyncPlan {
        target_warehouse: target.clone(),
        target_region: region,
        validation,
        batches,
    }
}

/// Dispatch order for propagating `source`'s changes to its peers.
///
/// Empty when cross-warehouse sync is disabled; `source` itself is never
/// scheduled.
pub fn schedule_peers(
    source: &WarehouseId,
    peers: &[WarehouseId],
    config: &SyncConfiguration,
    now: DateTime<Utc>,
) -> Vec<ScheduledSync> {
    if !config.enable_cross_warehouse_sync {
        tracing::debug!(source = %source, "cross-warehouse sync disabled");
        return Vec::new();
    }

    let targets: Vec<&str> = peers
        .iter()
        .filter(|peer| *peer != source)
        .map(WarehouseId::as_str)
        .collect();

    scheduler::schedule(source.as_str(), targets.as_slice(), now)
}
