//! Packing validated records into bounded, priority-ordered batches.

use serde::Serialize;

use stocksync_core::{BatchId, ProductSyncRecord, SyncConfiguration, SyncPriority};

/// Estimated transmission time per product.
pub const PER_PRODUCT_DURATION_MS: u64 = 100;

/// Fixed per-batch overhead.
pub const BATCH_OVERHEAD_MS: u64 = 500;

/// Duration multiplier applied when any member is flagged `isComplex`.
pub const COMPLEXITY_MULTIPLIER: f64 = 1.5;

/// A bounded group of records planned for one outbound transmission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncBatch {
    pub batch_id: BatchId,
    pub products: Vec<ProductSyncRecord>,
    /// Highest priority among the members.
    pub priority: SyncPriority,
    pub estimated_duration_ms: u64,
    /// Most frequent `metadata.region` among the members, if any carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl SyncBatch {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Priority the planner orders a record by.
///
/// `metadata.priority` (MEDIUM when absent), raised to the configured
/// per-product override if that is higher.
pub fn effective_priority(record: &ProductSyncRecord, config: &SyncConfiguration) -> SyncPriority {
    let priority = record.metadata.priority.unwrap_or_default();
    match config.priority_override(&record.product_id) {
        Some(floor) => priority.escalate(floor),
        None => priority,
    }
}

/// Plan batches for `records`.
///
/// Records are stably sorted by descending priority weight. A new batch starts
/// when the current one holds `config.batch_size` records or when the next
/// record's weight differs significantly from the batch's. Every input record
/// lands in exactly one batch.
pub fn plan(records: &[ProductSyncRecord], config: &SyncConfiguration) -> Vec<SyncBatch> {
    let capacity = config.batch_size.max(1);

    let mut ranked: Vec<(SyncPriority, &ProductSyncRecord)> = records
        .iter()
        .map(|record| (effective_priority(record, config), record))
        .collect();
    ranked.sort_by(|a, b| b.0.weight().cmp(&a.0.weight()));

    let mut batches = Vec::new();
    let mut current: Vec<&ProductSyncRecord> = Vec::with_capacity(capacity);
    let mut current_priority = SyncPriority::Low;

    for (priority, record) in ranked {
        if !current.is_empty()
            && (current.len() >= capacity || current_priority.differs_significantly(priority))
        {
            batches.push(close_batch(&current, current_priority));
            current.clear();
        }

        current_priority = if current.is_empty() {
            priority
        } else {
            current_priority.escalate(priority)
        };
        current.push(record);
    }

    if !current.is_empty() {
        batches.push(close_batch(&current, current_priority));
    }

    tracing::info!(
        records = records.len(),
        batches = batches.len(),
        batch_size = capacity,
        "planned sync batches"
    );

    batches
}

fn close_batch(members: &[&ProductSyncRecord], priority: SyncPriority) -> SyncBatch {
    let complex = members.iter().any(|r| r.metadata.is_complex);
    let batch = SyncBatch {
        batch_id: BatchId::new(),
        products: members.iter().map(|r| (*r).clone()).collect(),
        priority,
        estimated_duration_ms: estimate_duration_ms(members.len(), complex),
        region: dominant_region(members),
    };

    tracing::debug!(
        batch_id = %batch.batch_id,
        size = batch.len(),
        priority = %batch.priority,
        region = batch.region.as_deref().unwrap_or("-"),
        "closed sync batch"
    );

    batch
}

/// `count * 100 * multiplier + 500`, multiplier 1.5 for complex batches.
pub fn estimate_duration_ms(count: usize, complex: bool) -> u64 {
    let multiplier = if complex { COMPLEXITY_MULTIPLIER } else { 1.0 };
    let per_product = (count as f64 * PER_PRODUCT_DURATION_MS as f64 * multiplier).round() as u64;
    per_product + BATCH_OVERHEAD_MS
}

/// Plurality vote over `metadata.region`; ties go to the first-seen value.
fn dominant_region(members: &[&ProductSyncRecord]) -> Option<String> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for region in members.iter().filter_map(|r| r.metadata.region.as_deref()) {
        match tally.iter_mut().find(|(seen, _)| *seen == region) {
            Some((_, count)) => *count += 1,
            None => tally.push((region, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (region, count) in tally {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((region, count));
        }
    }
    best.map(|(region, _)| region.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use stocksync_core::RecordMetadata;

    fn config(batch_size: usize) -> SyncConfiguration {
        SyncConfiguration {
            batch_size,
            ..SyncConfiguration::default()
        }
    }

    fn record(id: &str, priority: SyncPriority) -> ProductSyncRecord {
        ProductSyncRecord::new(id, 1).with_priority(priority)
    }

    fn with_region(record: ProductSyncRecord, region: &str) -> ProductSyncRecord {
        let mut record = record;
        record.metadata.region = Some(region.to_string());
        record
    }

    fn ids(batch: &SyncBatch) -> Vec<&str> {
        batch.products.iter().map(|r| r.product_id.as_str()).collect()
    }

    #[test]
    fn uniform_priority_splits_by_batch_size() {
        let records: Vec<_> = (0..25)
            .map(|i| record(&format!("p{i}"), SyncPriority::Medium))
            .collect();

        let batches = plan(&records, &config(10));

        let sizes: Vec<_> = batches.iter().map(SyncBatch::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
        assert!(batches.iter().all(|b| b.priority == SyncPriority::Medium));
    }

    #[test]
    fn orders_by_priority_and_keeps_insertion_order_on_ties() {
        let records = vec![
            record("a", SyncPriority::Medium),
            record("b", SyncPriority::High),
            record("c", SyncPriority::Medium),
            record("d", SyncPriority::High),
        ];

        let batches = plan(&records, &config(10));

        assert_eq!(batches.len(), 1);
        assert_eq!(ids(&batches[0]), vec!["b", "d", "a", "c"]);
        assert_eq!(batches[0].priority, SyncPriority::High);
    }

    #[test]
    fn significant_priority_jump_starts_new_batch() {
        let records = vec![
            record("crit", SyncPriority::Critical),
            record("med", SyncPriority::Medium),
            record("low", SyncPriority::Low),
        ];

        let batches = plan(&records, &config(10));

        // CRITICAL→MEDIUM is a 50 gap; MEDIUM→LOW is only 25.
        assert_eq!(batches.len(), 2);
        assert_eq!(ids(&batches[0]), vec!["crit"]);
        assert_eq!(ids(&batches[1]), vec!["med", "low"]);
        assert_eq!(batches[1].priority, SyncPriority::Medium);
    }

    #[test]
    fn gap_is_measured_against_batch_priority() {
        // HIGH→MEDIUM (25) stays, but LOW is 50 below the batch's HIGH.
        let records = vec![
            record("h", SyncPriority::High),
            record("m", SyncPriority::Medium),
            record("l", SyncPriority::Low),
        ];

        let batches = plan(&records, &config(10));

        assert_eq!(batches.len(), 2);
        assert_eq!(ids(&batches[0]), vec!["h", "m"]);
        assert_eq!(ids(&batches[1]), vec!["l"]);
    }

    #[test]
    fn duration_accounts_for_complexity() {
        assert_eq!(estimate_duration_ms(10, false), 1_500);
        assert_eq!(estimate_duration_ms(10, true), 2_000);
        assert_eq!(estimate_duration_ms(3, true), 950);

        let mut complex = record("x", SyncPriority::Medium);
        complex.metadata.is_complex = true;
        let batches = plan(&[record("y", SyncPriority::Medium), complex], &config(10));
        assert_eq!(batches[0].estimated_duration_ms, 800);
    }

    #[test]
    fn region_is_plurality_with_first_seen_tiebreak() {
        let records = vec![
            with_region(record("a", SyncPriority::Medium), "EU"),
            with_region(record("b", SyncPriority::Medium), "US"),
            with_region(record("c", SyncPriority::Medium), "US"),
            record("d", SyncPriority::Medium),
        ];
        assert_eq!(plan(&records, &config(10))[0].region.as_deref(), Some("US"));

        let tied = vec![
            with_region(record("a", SyncPriority::Medium), "JAPAN"),
            with_region(record("b", SyncPriority::Medium), "EU"),
        ];
        assert_eq!(plan(&tied, &config(10))[0].region.as_deref(), Some("JAPAN"));

        let none = vec![record("a", SyncPriority::Medium)];
        assert_eq!(plan(&none, &config(10))[0].region, None);
    }

    #[test]
    fn overrides_raise_planning_priority() {
        let mut cfg = config(10);
        cfg.priority_overrides = HashMap::from([("b".to_string(), SyncPriority::Critical)]);
        let records = vec![record("a", SyncPriority::High), ProductSyncRecord::new("b", 1)];

        let batches = plan(&records, &cfg);

        assert_eq!(ids(&batches[0]), vec!["b", "a"]);
        assert_eq!(batches[0].priority, SyncPriority::Critical);
    }

    #[test]
    fn empty_input_yields_no_batches() {
        assert!(plan(&[], &config(10)).is_empty());
    }

    fn arb_record() -> impl Strategy<Value = ProductSyncRecord> {
        (
            prop::sample::select(SyncPriority::ALL.to_vec()),
            proptest::option::of(prop::sample::select(vec!["US", "EU", "JAPAN"])),
            any::<bool>(),
        )
            .prop_map(|(priority, region, is_complex)| {
                ProductSyncRecord::new("p", 1).with_metadata(RecordMetadata {
                    priority: Some(priority),
                    region: region.map(str::to_string),
                    is_complex,
                    ..RecordMetadata::default()
                })
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: no batch exceeds the configured size, and the batches
        /// together hold exactly the input records.
        #[test]
        fn batches_are_bounded_and_conserve_records(
            records in prop::collection::vec(arb_record(), 0..120),
            batch_size in 1usize..=100,
        ) {
            let batches = plan(&records, &config(batch_size));

            prop_assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= batch_size));
            let total: usize = batches.iter().map(SyncBatch::len).sum();
            prop_assert_eq!(total, records.len());

            // Batch priority is the maximum of its members and batches never
            // increase in priority along the plan.
            for batch in &batches {
                let max = batch
                    .products
                    .iter()
                    .map(|r| r.metadata.priority.unwrap_or_default())
                    .max()
                    .unwrap();
                prop_assert_eq!(batch.priority, max);
            }
            for pair in batches.windows(2) {
                prop_assert!(pair[0].priority >= pair[1].priority);
            }
        }
    }
}
