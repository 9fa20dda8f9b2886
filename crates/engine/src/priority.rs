//! Per-record sync urgency scoring.
//!
//! Scoring only ever escalates: each rule can raise the priority seen so far,
//! none can lower it. A rush order is the final override and always wins.

use chrono::{DateTime, Utc};

use stocksync_core::{
    FlexVoltCapacity, InventoryItem, InventoryStatus, ProductSyncRecord, Region, SyncConfiguration,
    SyncPriority,
};

/// Quantities above this escalate to HIGH.
pub const BULK_QUANTITY_THRESHOLD: i64 = 1_000;

/// Score `record` for propagation into `region`.
pub fn calculate(
    record: &ProductSyncRecord,
    region: Region,
    current_inventory: Option<&InventoryItem>,
    now: DateTime<Utc>,
) -> SyncPriority {
    score(record, region, current_inventory, None, now)
}

/// Like [`calculate`], additionally honouring `config.priority_overrides` as a
/// floor for the product.
pub fn calculate_with_config(
    record: &ProductSyncRecord,
    region: Region,
    current_inventory: Option<&InventoryItem>,
    config: &SyncConfiguration,
    now: DateTime<Utc>,
) -> SyncPriority {
    let floor = config.priority_override(&record.product_id);
    score(record, region, current_inventory, floor, now)
}

fn score(
    record: &ProductSyncRecord,
    region: Region,
    current_inventory: Option<&InventoryItem>,
    floor: Option<SyncPriority>,
    now: DateTime<Utc>,
) -> SyncPriority {
    let status = current_inventory.map(|item| item.status);

    let mut priority = if status == Some(InventoryStatus::OutOfStock) {
        SyncPriority::Critical
    } else {
        let mut p = SyncPriority::Medium;
        if status == Some(InventoryStatus::LowStock) {
            p = p.escalate(SyncPriority::High);
        }
        if record.flexvolt_capacity() == Some(FlexVoltCapacity::Ah15) {
            p = p.escalate(SyncPriority::High);
        }
        if region.is_working_hours(now) {
            p = p.escalate(SyncPriority::High);
        }
        if record.quantity > BULK_QUANTITY_THRESHOLD {
            p = p.escalate(SyncPriority::High);
        }
        p
    };

    if let Some(floor) = floor {
        priority = priority.escalate(floor);
    }

    if record.metadata.is_rush_order {
        priority = SyncPriority::Critical;
    }

    tracing::debug!(
        product_id = %record.product_id,
        %region,
        %priority,
        "scored sync record"
    );

    priority
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use stocksync_core::{FLEXVOLT_PRODUCT_TYPE, RecordMetadata};

    const PRODUCT: &str = "0190a5a8-3f3e-7cc0-8f5e-6a1b2c3d4e5f";

    /// 03:00 UTC: outside US working hours (22:00 local).
    fn off_hours_for_us() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap()
    }

    /// 15:00 UTC: inside US working hours (10:00 local).
    fn business_hours_for_us() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap()
    }

    fn item(status: InventoryStatus) -> InventoryItem {
        InventoryItem::new(PRODUCT, 0, status, off_hours_for_us())
    }

    #[test]
    fn defaults_to_medium() {
        let record = ProductSyncRecord::new(PRODUCT, 10);
        assert_eq!(
            calculate(&record, Region::Us, None, off_hours_for_us()),
            SyncPriority::Medium
        );
    }

    #[test]
    fn out_of_stock_is_critical_even_for_bulk_quantities() {
        let record = ProductSyncRecord::new(PRODUCT, 2_000);
        let inventory = item(InventoryStatus::OutOfStock);
        assert_eq!(
            calculate(&record, Region::Us, Some(&inventory), off_hours_for_us()),
            SyncPriority::Critical
        );
    }

    #[test]
    fn low_stock_escalates_to_high() {
        let record = ProductSyncRecord::new(PRODUCT, 1);
        let inventory = item(InventoryStatus::LowStock);
        assert_eq!(
            calculate(&record, Region::Us, Some(&inventory), off_hours_for_us()),
            SyncPriority::High
        );
    }

    #[test]
    fn flexvolt_15ah_escalates_to_high() {
        let record = ProductSyncRecord::new(PRODUCT, 1).with_metadata(RecordMetadata {
            product_type: Some(FLEXVOLT_PRODUCT_TYPE.to_string()),
            capacity: Some("15Ah".to_string()),
            ..RecordMetadata::default()
        });
        assert_eq!(
            calculate(&record, Region::Us, None, off_hours_for_us()),
            SyncPriority::High
        );
    }

    #[test]
    fn working_hours_escalate_to_high() {
        let record = ProductSyncRecord::new(PRODUCT, 1);
        assert_eq!(
            calculate(&record, Region::Us, None, business_hours_for_us()),
            SyncPriority::High
        );
    }

    #[test]
    fn bulk_quantity_threshold_is_exclusive() {
        let at = ProductSyncRecord::new(PRODUCT, BULK_QUANTITY_THRESHOLD);
        let above = ProductSyncRecord::new(PRODUCT, BULK_QUANTITY_THRESHOLD + 1);
        assert_eq!(calculate(&at, Region::Us, None, off_hours_for_us()), SyncPriority::Medium);
        assert_eq!(calculate(&above, Region::Us, None, off_hours_for_us()), SyncPriority::High);
    }

    #[test]
    fn rush_order_forces_critical() {
        let record = ProductSyncRecord::new(PRODUCT, 1).with_metadata(RecordMetadata {
            is_rush_order: true,
            ..RecordMetadata::default()
        });
        let inventory = item(InventoryStatus::InStock);
        assert_eq!(
            calculate(&record, Region::Us, Some(&inventory), off_hours_for_us()),
            SyncPriority::Critical
        );
    }

    #[test]
    fn configured_override_acts_as_floor() {
        let config = SyncConfiguration {
            priority_overrides: HashMap::from([(PRODUCT.to_string(), SyncPriority::Critical)]),
            ..SyncConfiguration::default()
        };
        let record = ProductSyncRecord::new(PRODUCT, 1);
        assert_eq!(
            calculate_with_config(&record, Region::Us, None, &config, off_hours_for_us()),
            SyncPriority::Critical
        );

        let low_floor = SyncConfiguration {
            priority_overrides: HashMap::from([(PRODUCT.to_string(), SyncPriority::Low)]),
            ..SyncConfiguration::default()
        };
        assert_eq!(
            calculate_with_config(&record, Region::Us, None, &low_floor, business_hours_for_us()),
            SyncPriority::High
        );
    }
}
