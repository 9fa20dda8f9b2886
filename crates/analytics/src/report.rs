use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocksync_core::WarehouseId;

/// Final state of a historical sync run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Completed,
    Failed,
    Cancelled,
}

/// One historical sync run, as supplied by the run-history store.
///
/// History is expected in chronological order (oldest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRunRecord {
    pub status: RunStatus,
    /// Wall-clock duration in milliseconds.
    pub duration: u64,
    pub synced_products: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl SyncRunRecord {
    pub fn new(status: RunStatus, duration: u64, synced_products: u64) -> Self {
        Self {
            status,
            duration,
            synced_products,
            started_at: None,
        }
    }
}

/// Point-in-time state of one warehouse, supplied by the monitoring side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseMetrics {
    pub warehouse_id: WarehouseId,
    /// Local changes not yet propagated to peers.
    #[serde(default)]
    pub pending_changes: u64,
    /// Conflicts parked for manual review.
    #[serde(default)]
    pub unresolved_conflicts: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_successful_sync: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_runs: usize,
    pub completed_runs: usize,
    pub failed_runs: usize,
    /// Percentage in \[0, 100\]; 100 when there are no runs.
    pub success_rate: f64,
    pub average_sync_time_ms: f64,
    /// Products synced per hour.
    pub throughput: f64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            total_runs: 0,
            completed_runs: 0,
            failed_runs: 0,
            success_rate: 100.0,
            average_sync_time_ms: 0.0,
            throughput: 0.0,
        }
    }
}

/// Direction a metric moved between the older and newer half of the history.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Improving,
    #[default]
    Stable,
    Degrading,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTrends {
    pub success_rate: Trend,
    pub sync_time: Trend,
    pub throughput: Trend,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
}

impl Alert {
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: AlertSeverity::Critical,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: AlertSeverity::Warning,
            message: message.into(),
        }
    }
}

/// Output of [`analyze`](crate::analyze).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub performance: PerformanceMetrics,
    pub trends: SyncTrends,
    pub recommendations: Vec<String>,
    pub alerts: Vec<Alert>,
}

impl AnalyticsReport {
    pub fn has_critical_alert(&self) -> bool {
        self.alerts.iter().any(|a| a.severity == AlertSeverity::Critical)
    }
}
