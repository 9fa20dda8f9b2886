//! Arbitration between divergent local and remote inventory records.
//!
//! Resolution is total: every call returns a concrete decision plus a flag
//! telling the persistence layer whether a human must confirm it.

use serde::Serialize;

use stocksync_core::{ConflictStrategy, InventoryItem, SyncConfiguration};

/// Which side of the conflict was chosen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedFrom {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResolutionResult {
    pub resolved: InventoryItem,
    pub resolved_from: ResolvedFrom,
    pub strategy: ConflictStrategy,
    pub reason: String,
    /// When set, `resolved` is a hold value and must not be treated as
    /// authoritative until reviewed.
    pub requires_manual_review: bool,
}

/// Pick an authoritative record under `strategy`.
pub fn resolve(
    local: &InventoryItem,
    remote: &InventoryItem,
    strategy: ConflictStrategy,
) -> ConflictResolutionResult {
    let (from, reason, requires_manual_review) = match strategy {
        ConflictStrategy::LastWriteWins => last_write_wins(local, remote),
        ConflictStrategy::PriorityBased => priority_based(local, remote),
        ConflictStrategy::Manual => (
            ResolvedFrom::Local,
            "manual resolution required; holding local value pending review".to_string(),
            true,
        ),
    };

    if requires_manual_review {
        tracing::warn!(
            product_id = %local.product_id,
            %strategy,
            %reason,
            "conflict queued for manual review"
        );
    } else {
        tracing::debug!(product_id = %local.product_id, %strategy, ?from, "conflict resolved");
    }

    let resolved = match from {
        ResolvedFrom::Local => local.clone(),
        ResolvedFrom::Remote => remote.clone(),
    };

    ConflictResolutionResult {
        resolved,
        resolved_from: from,
        strategy,
        reason,
        requires_manual_review,
    }
}

/// Resolve under the configured strategy.
///
/// With `auto_resolve_conflicts` disabled every conflict is held for manual
/// review regardless of the configured strategy.
pub fn resolve_with_config(
    local: &InventoryItem,
    remote: &InventoryItem,
    config: &SyncConfiguration,
) -> ConflictResolutionResult {
    let strategy = if config.auto_resolve_conflicts {
        config.conflict_resolution
    } else {
        ConflictStrategy::Manual
    };
    resolve(local, remote, strategy)
}

fn last_write_wins(local: &InventoryItem, remote: &InventoryItem) -> (ResolvedFrom, String, bool) {
    if remote.last_updated > local.last_updated {
        (
            ResolvedFrom::Remote,
            format!(
                "remote updated more recently ({} > {})",
                remote.last_updated.to_rfc3339(),
                local.last_updated.to_rfc3339()
            ),
            false,
        )
    } else if local.last_updated > remote.last_updated {
        (
            ResolvedFrom::Local,
            format!(
                "local updated more recently ({} > {})",
                local.last_updated.to_rfc3339(),
                remote.last_updated.to_rfc3339()
            ),
            false,
        )
    } else {
        (
            ResolvedFrom::Local,
            "identical update timestamps; keeping local".to_string(),
            false,
        )
    }
}

fn priority_based(local: &InventoryItem, remote: &InventoryItem) -> (ResolvedFrom, String, bool) {
    let (lp, rp) = (local.priority(), remote.priority());

    if rp.weight() > lp.weight() {
        (
            ResolvedFrom::Remote,
            format!("remote priority {rp} outranks local priority {lp}"),
            false,
        )
    } else if lp.weight() > rp.weight() {
        (
            ResolvedFrom::Local,
            format!("local priority {lp} outranks remote priority {rp}"),
            false,
        )
    } else {
        (
            ResolvedFrom::Local,
            format!("equal priority {lp} on both sides; keeping local, review required"),
            true,
        )
    }
}
