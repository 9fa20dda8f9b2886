use crate::report::{
    Alert, AnalyticsReport, PerformanceMetrics, RunStatus, SyncRunRecord, SyncTrends, Trend,
    WarehouseMetrics,
};

/// Success rate below this raises a CRITICAL alert.
pub const CRITICAL_SUCCESS_RATE: f64 = 90.0;

/// Success rate below this raises a WARNING alert.
pub const WARNING_SUCCESS_RATE: f64 = 95.0;

/// Average sync time above this raises a WARNING alert.
pub const AVERAGE_TIME_ALERT_MS: f64 = 60_000.0;

/// Average sync time above this triggers a batching recommendation.
pub const SLOW_SYNC_RECOMMENDATION_MS: f64 = 30_000.0;

/// Pending changes above this suggest syncing more often.
pub const PENDING_BACKLOG_THRESHOLD: u64 = 1_000;

/// Trends need at least this many runs (two per half).
const MIN_RUNS_FOR_TREND: usize = 4;

/// Success-rate movement, in percentage points, treated as a real change.
const SUCCESS_RATE_TREND_POINTS: f64 = 5.0;

/// Relative movement of duration/throughput treated as a real change.
const RELATIVE_TREND_BAND: f64 = 0.10;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Derive performance figures, trends, alerts and recommendations.
///
/// `history` is expected oldest first.
pub fn analyze(history: &[SyncRunRecord], warehouse_metrics: &[WarehouseMetrics]) -> AnalyticsReport {
    let performance = performance(history);
    let trends = trends(history);
    let alerts = alerts(&performance, warehouse_metrics);
    let recommendations = recommendations(&performance, &trends, warehouse_metrics);

    tracing::info!(
        runs = performance.total_runs,
        success_rate = performance.success_rate,
        average_sync_time_ms = performance.average_sync_time_ms,
        alerts = alerts.len(),
        "analyzed sync history"
    );

    AnalyticsReport {
        performance,
        trends,
        recommendations,
        alerts,
    }
}

fn performance(history: &[SyncRunRecord]) -> PerformanceMetrics {
    if history.is_empty() {
        return PerformanceMetrics::default();
    }

    let total_runs = history.len();
    let completed_runs = history
        .iter()
        .filter(|r| r.status == RunStatus::Completed)
        .count();
    let failed_runs = history
        .iter()
        .filter(|r| r.status == RunStatus::Failed)
        .count();
    let total_duration = history
        .iter()
        .map(|r| r.duration)
        .fold(0u64, u64::saturating_add);
    let total_products = history
        .iter()
        .map(|r| r.synced_products)
        .fold(0u64, u64::saturating_add);

    PerformanceMetrics {
        total_runs,
        completed_runs,
        failed_runs,
        success_rate: completed_runs as f64 / total_runs as f64 * 100.0,
        average_sync_time_ms: total_duration as f64 / total_runs as f64,
        throughput: throughput(total_products, total_duration),
    }
}

fn throughput(products: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 0.0;
    }
    products as f64 / duration_ms as f64 * MS_PER_HOUR
}

/// Compare the older half of the history against the newer half.
fn trends(history: &[SyncRunRecord]) -> SyncTrends {
    if history.len() < MIN_RUNS_FOR_TREND {
        return SyncTrends::default();
    }

    let (older, newer) = history.split_at(history.len() / 2);
    let (older, newer) = (performance(older), performance(newer));

    let success_delta = newer.success_rate - older.success_rate;
    let success_rate = if success_delta > SUCCESS_RATE_TREND_POINTS {
        Trend::Improving
    } else if success_delta < -SUCCESS_RATE_TREND_POINTS {
        Trend::Degrading
    } else {
        Trend::Stable
    };

    // Shorter syncs are an improvement; higher throughput is an improvement.
    let sync_time = match relative_change(older.average_sync_time_ms, newer.average_sync_time_ms) {
        Trend::Improving => Trend::Degrading,
        Trend::Degrading => Trend::Improving,
        Trend::Stable => Trend::Stable,
    };
    let throughput = relative_change(older.throughput, newer.throughput);

    SyncTrends {
        success_rate,
        sync_time,
        throughput,
    }
}

/// `Improving` when `newer` rose beyond the band, `Degrading` when it fell.
fn relative_change(older: f64, newer: f64) -> Trend {
    if older <= 0.0 {
        return Trend::Stable;
    }
    let ratio = newer / older;
    if ratio > 1.0 + RELATIVE_TREND_BAND {
        Trend::Improving
    } else if ratio < 1.0 - RELATIVE_TREND_BAND {
        Trend::Degrading
    } else {
        Trend::Stable
    }
}

fn alerts(performance: &PerformanceMetrics, warehouses: &[WarehouseMetrics]) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if performance.success_rate < CRITICAL_SUCCESS_RATE {
        alerts.push(Alert::critical(format!(
            "sync success rate {:.1}% is below {CRITICAL_SUCCESS_RATE}%",
            performance.success_rate
        )));
    } else if performance.success_rate < WARNING_SUCCESS_RATE {
        alerts.push(Alert::warning(format!(
            "sync success rate {:.1}% is below {WARNING_SUCCESS_RATE}%",
            performance.success_rate
        )));
    }

    if performance.average_sync_time_ms > AVERAGE_TIME_ALERT_MS {
        alerts.push(Alert::warning(format!(
            "average sync time {:.0}ms exceeds {AVERAGE_TIME_ALERT_MS}ms",
            performance.average_sync_time_ms
        )));
    }

    for warehouse in warehouses.iter().filter(|w| w.unresolved_conflicts > 0) {
        alerts.push(Alert::warning(format!(
            "{} has {} conflict(s) awaiting manual review",
            warehouse.warehouse_id, warehouse.unresolved_conflicts
        )));
    }

    alerts
}

fn recommendations(
    performance: &PerformanceMetrics,
    trends: &SyncTrends,
    warehouses: &[WarehouseMetrics],
) -> Vec<String> {
    let mut out = Vec::new();

    if performance.average_sync_time_ms > SLOW_SYNC_RECOMMENDATION_MS {
        out.push(
            "optimize batching: average sync time exceeds 30s; consider smaller batches or more concurrent dispatch"
                .to_string(),
        );
    }

    if performance.success_rate < WARNING_SUCCESS_RATE {
        out.push(format!(
            "investigate failing sync runs ({} of {} failed); consider raising maxRetryAttempts or timeoutMs",
            performance.failed_runs, performance.total_runs
        ));
    }

    if trends.sync_time == Trend::Degrading {
        out.push("sync time is trending up; review recent catalog or network changes".to_string());
    }

    for warehouse in warehouses {
        if warehouse.pending_changes > PENDING_BACKLOG_THRESHOLD {
            out.push(format!(
                "{} has {} pending changes; consider shortening syncInterval",
                warehouse.warehouse_id, warehouse.pending_changes
            ));
        }
        if warehouse.unresolved_conflicts > 0 {
            out.push(format!(
                "review {} manual conflict(s) for {}",
                warehouse.unresolved_conflicts, warehouse.warehouse_id
            ));
        }
    }

    out
}
