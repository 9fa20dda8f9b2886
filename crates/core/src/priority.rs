//! Sync urgency levels and escalation.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Weight gap above which two priorities are considered "significantly" apart.
///
/// MEDIUM → HIGH (25) is not significant; MEDIUM → CRITICAL (50) is.
pub const SIGNIFICANT_PRIORITY_GAP: u8 = 25;

/// Urgency of propagating a change.
///
/// The discriminant is a *weight*, not a display value: ordering and
/// escalation always operate on [`SyncPriority::weight`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncPriority {
    Critical = 100,
    High = 75,
    Medium = 50,
    Low = 25,
}

impl SyncPriority {
    /// All priorities, highest weight first.
    pub const ALL: [SyncPriority; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    pub const fn weight(self) -> u8 {
        self as u8
    }

    /// Returns whichever of `self` and `candidate` carries the higher weight.
    ///
    /// Never downgrades: on equal weight `self` is kept.
    #[must_use]
    pub fn escalate(self, candidate: SyncPriority) -> SyncPriority {
        if candidate.weight() > self.weight() {
            candidate
        } else {
            self
        }
    }

    /// True when the weight gap between `self` and `other` exceeds
    /// [`SIGNIFICANT_PRIORITY_GAP`].
    pub fn differs_significantly(self, other: SyncPriority) -> bool {
        self.weight().abs_diff(other.weight()) > SIGNIFICANT_PRIORITY_GAP
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPriority::Critical => "CRITICAL",
            SyncPriority::High => "HIGH",
            SyncPriority::Medium => "MEDIUM",
            SyncPriority::Low => "LOW",
        }
    }
}

impl Default for SyncPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Ord for SyncPriority {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.weight().cmp(&other.weight())
    }
}

impl PartialOrd for SyncPriority {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for SyncPriority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SyncPriority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::unknown("sync priority", s))
    }
}
