//! `stocksync-analytics`
//!
//! Health signals derived from historical sync runs: performance figures,
//! trends, alerts and recommendations for a monitoring dashboard.
//!
//! Analysis never fails. Empty or degenerate history yields zeroed, neutral
//! values so that a dashboard never breaks on missing data.

pub mod analyzer;
pub mod report;

pub use analyzer::{
    AVERAGE_TIME_ALERT_MS, CRITICAL_SUCCESS_RATE, PENDING_BACKLOG_THRESHOLD,
    SLOW_SYNC_RECOMMENDATION_MS, WARNING_SUCCESS_RATE, analyze,
};
pub use report::{
    Alert, AlertSeverity, AnalyticsReport, PerformanceMetrics, RunStatus, SyncRunRecord, SyncTrends,
    Trend, WarehouseMetrics,
};
