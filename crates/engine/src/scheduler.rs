//! Cross-warehouse propagation ordering.
//!
//! Given a source warehouse and its peers, scores each peer and recommends a
//! dispatch order. The orchestrator may still run compatible batches in
//! parallel; the order is advisory.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use stocksync_core::{Hemisphere, Region, WarehouseId};

pub const BASE_SCORE: f64 = 50.0;
pub const SAME_REGION_BONUS: f64 = 30.0;
pub const BUSINESS_HOURS_BONUS: f64 = 20.0;
pub const DEMAND_WEIGHT: f64 = 10.0;

/// Demand boost inside a hemisphere's construction season.
pub const SEASONAL_BOOST: f64 = 1.2;

/// Northern construction season, 0-indexed months, inclusive (April–October).
pub const NORTHERN_SEASON_MONTHS: core::ops::RangeInclusive<u32> = 3..=9;

pub const PROCESSING_OVERHEAD_MS: u64 = 50;
pub const OFF_HOURS_DELAY_MULTIPLIER: f64 = 1.5;

/// Latency used for region pairs missing from the table (including same-region).
pub const DEFAULT_LATENCY_MS: u64 = 100;

/// When a peer should receive the update.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncWindow {
    BusinessHours,
    OffHours,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSync {
    pub warehouse_id: WarehouseId,
    pub region: Region,
    pub priority_score: f64,
    pub sync_window: SyncWindow,
    pub estimated_delay_ms: u64,
}

/// Fixed base demand per region.
pub fn base_demand(region: Region) -> f64 {
    match region {
        Region::Us => 0.8,
        Region::Japan => 0.6,
        Region::Eu => 0.7,
        Region::Australia => 0.5,
    }
}

/// Seasonal multiplier for `region` at `now`.
///
/// Japan is treated as seasonally flat.
pub fn seasonal_adjustment(region: Region, now: DateTime<Utc>) -> f64 {
    if region == Region::Japan {
        return 1.0;
    }
    let in_northern_season = NORTHERN_SEASON_MONTHS.contains(&now.month0());
    let in_season = match region.descriptor().hemisphere {
        Hemisphere::Northern => in_northern_season,
        Hemisphere::Southern => !in_northern_season,
    };
    if in_season { SEASONAL_BOOST } else { 1.0 }
}

pub fn regional_demand_factor(region: Region, now: DateTime<Utc>) -> f64 {
    base_demand(region) * seasonal_adjustment(region, now)
}

/// Base network latency between two regions, symmetric.
pub fn base_latency_ms(a: Region, b: Region) -> u64 {
    use Region::*;
    match (a, b) {
        (Us, Japan) | (Japan, Us) => 150,
        (Us, Eu) | (Eu, Us) => 100,
        (Us, Australia) | (Australia, Us) => 200,
        (Japan, Eu) | (Eu, Japan) => 250,
        (Japan, Australia) | (Australia, Japan) => 100,
        (Eu, Australia) | (Australia, Eu) => 300,
        _ => DEFAULT_LATENCY_MS,
    }
}

/// Expected delay before a peer sees the update.
pub fn estimate_delay_ms(source: Region, target: Region, within_business_hours: bool) -> u64 {
    let base = base_latency_ms(source, target) + PROCESSING_OVERHEAD_MS;
    if within_business_hours {
        base
    } else {
        (base as f64 * OFF_HOURS_DELAY_MULTIPLIER).round() as u64
    }
}

/// Score one target warehouse relative to `source`.
pub fn score_target(source: Region, target: Region, now: DateTime<Utc>) -> f64 {
    let mut score = BASE_SCORE;
    if source == target {
        score += SAME_REGION_BONUS;
    }
    if target.is_working_hours(now) {
        score += BUSINESS_HOURS_BONUS;
    }
    score + DEMAND_WEIGHT * regional_demand_factor(target, now)
}

/// Recommend the order in which `targets` should receive `source`'s changes.
///
/// Output is sorted by descending `priority_score`; equal scores keep input
/// order. Warehouse ids are mapped to regions with [`Region::for_warehouse`].
pub fn schedule<S: AsRef<str>>(
    source_warehouse: &str,
    target_warehouses: &[S],
    now: DateTime<Utc>,
) -> Vec<ScheduledSync> {
    let source = Region::for_warehouse(source_warehouse);

    let mut plan: Vec<ScheduledSync> = target_warehouses
        .iter()
        .map(|target| {
            let target_id = target.as_ref();
            let region = Region::for_warehouse(target_id);
            let business_hours = region.is_working_hours(now);
            ScheduledSync {
                warehouse_id: WarehouseId::new(target_id),
                region,
                priority_score: score_target(source, region, now),
                sync_window: if business_hours {
                    SyncWindow::BusinessHours
                } else {
                    SyncWindow::OffHours
                },
                estimated_delay_ms: estimate_delay_ms(source, region, business_hours),
            }
        })
        .collect();

    plan.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));

    tracing::debug!(
        source = source_warehouse,
        %source,
        targets = plan.len(),
        "scheduled cross-warehouse sync"
    );

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    /// 01:00 UTC in January: Tokyo 10:00 (open), New York 20:00, Berlin 02:00,
    /// Sydney 11:00 (open).
    fn january_night_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 1, 0, 0).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn seasonal_adjustment_by_hemisphere() {
        let july = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let january = january_night_utc();

        assert_close(seasonal_adjustment(Region::Us, july), 1.2);
        assert_close(seasonal_adjustment(Region::Us, january), 1.0);
        assert_close(seasonal_adjustment(Region::Australia, july), 1.0);
        assert_close(seasonal_adjustment(Region::Australia, january), 1.2);
        assert_close(seasonal_adjustment(Region::Japan, july), 1.0);
    }

    #[test]
    fn season_window_is_april_through_october() {
        let march = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let april = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let october = Utc.with_ymd_and_hms(2024, 10, 31, 0, 0, 0).unwrap();
        let november = Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap();

        assert_close(seasonal_adjustment(Region::Eu, march), 1.0);
        assert_close(seasonal_adjustment(Region::Eu, april), 1.2);
        assert_close(seasonal_adjustment(Region::Eu, october), 1.2);
        assert_close(seasonal_adjustment(Region::Eu, november), 1.0);
    }

    #[test]
    fn latency_table_is_symmetric_with_default() {
        for a in Region::ALL {
            for b in Region::ALL {
                assert_eq!(base_latency_ms(a, b), base_latency_ms(b, a));
            }
        }
        assert_eq!(base_latency_ms(Region::Eu, Region::Australia), 300);
        assert_eq!(base_latency_ms(Region::Us, Region::Us), DEFAULT_LATENCY_MS);
    }

    #[test]
    fn delay_is_inflated_off_hours() {
        assert_eq!(estimate_delay_ms(Region::Us, Region::Japan, true), 200);
        assert_eq!(estimate_delay_ms(Region::Us, Region::Japan, false), 300);
    }

    #[test]
    fn scores_and_orders_targets() {
        let now = january_night_utc();
        let plan = schedule("us-warehouse", &["eu-warehouse", "japan-warehouse"], now);

        assert_eq!(plan.len(), 2);
        // Japan: 50 + 20 (open) + 10 * 0.6 = 76; EU: 50 + 10 * 0.7 = 57.
        assert_eq!(plan[0].warehouse_id.as_str(), "japan-warehouse");
        assert_close(plan[0].priority_score, 76.0);
        assert_eq!(plan[0].sync_window, SyncWindow::BusinessHours);
        assert_eq!(plan[0].estimated_delay_ms, 200);

        assert_eq!(plan[1].region, Region::Eu);
        assert_close(plan[1].priority_score, 57.0);
        assert_eq!(plan[1].sync_window, SyncWindow::OffHours);
        assert_eq!(plan[1].estimated_delay_ms, 225);
    }

    #[test]
    fn same_region_gets_bonus() {
        let now = january_night_utc();
        let plan = schedule("us-warehouse", &["us-west-warehouse"], now);
        // 50 + 30 + 10 * 0.8, US closed at 20:00 local.
        assert_close(plan[0].priority_score, 88.0);
        assert_eq!(plan[0].estimated_delay_ms, 225);
    }

    #[test]
    fn unknown_target_is_treated_as_us() {
        let plan = schedule("eu-warehouse", &["moon-base"], january_night_utc());
        assert_eq!(plan[0].region, Region::Us);
    }

    proptest! {
        /// Property: output is non-increasing in score and delays stay within
        /// the documented latency bounds.
        #[test]
        fn schedule_is_sorted_and_bounded(
            targets in prop::collection::vec(
                prop::sample::select(vec!["us-a", "japan-b", "eu-c", "australia-d", "unknown"]),
                0..8,
            ),
            hour in 0u32..24,
            month in 1u32..=12,
        ) {
            let now = Utc.with_ymd_and_hms(2024, month, 10, hour, 0, 0).unwrap();
            let plan = schedule("japan-warehouse", targets.as_slice(), now);

            prop_assert_eq!(plan.len(), targets.len());
            for pair in plan.windows(2) {
                prop_assert!(pair[0].priority_score >= pair[1].priority_score);
            }
            for entry in &plan {
                let base = base_latency_ms(Region::Japan, entry.region) + PROCESSING_OVERHEAD_MS;
                prop_assert!(entry.estimated_delay_ms >= base);
                prop_assert!(entry.estimated_delay_ms as f64 <= base as f64 * OFF_HOURS_DELAY_MULTIPLIER);
            }
        }
    }
}
