//! Incoming product sync records.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::priority::SyncPriority;

/// `metadata.productType` value identifying the FlexVolt battery line.
pub const FLEXVOLT_PRODUCT_TYPE: &str = "FLEXVOLT_BATTERY";

/// The three valid FlexVolt battery capacities.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlexVoltCapacity {
    #[serde(rename = "6Ah")]
    Ah6,
    #[serde(rename = "9Ah")]
    Ah9,
    #[serde(rename = "15Ah")]
    Ah15,
}

impl FlexVoltCapacity {
    pub const ALL: [FlexVoltCapacity; 3] = [Self::Ah6, Self::Ah9, Self::Ah15];

    /// Reference list price in whole currency units.
    pub const fn reference_price(self) -> u32 {
        match self {
            FlexVoltCapacity::Ah6 => 149,
            FlexVoltCapacity::Ah9 => 239,
            FlexVoltCapacity::Ah15 => 359,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlexVoltCapacity::Ah6 => "6Ah",
            FlexVoltCapacity::Ah9 => "9Ah",
            FlexVoltCapacity::Ah15 => "15Ah",
        }
    }
}

impl core::fmt::Display for FlexVoltCapacity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlexVoltCapacity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlexVoltCapacity::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::unknown("FlexVolt capacity", s))
    }
}

/// Open metadata map attached to a sync record.
///
/// Well-known keys are typed; anything else is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<SyncPriority>,
    #[serde(default)]
    pub is_rush_order: bool,
    #[serde(default)]
    pub is_complex: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One product change submitted for synchronization.
///
/// Constructed by the ingestion layer and never mutated afterwards; the
/// `with_*` builders return new values. Fields are kept in their raw form
/// (`product_id` as a string, `expiry_date` as text) so that the validator
/// can report malformed input instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSyncRecord {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default)]
    pub metadata: RecordMetadata,
}

impl ProductSyncRecord {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            location: None,
            batch_number: None,
            expiry_date: None,
            cost: None,
            metadata: RecordMetadata::default(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_batch_number(mut self, batch_number: impl Into<String>) -> Self {
        self.batch_number = Some(batch_number.into());
        self
    }

    pub fn with_expiry_date(mut self, expiry_date: impl Into<String>) -> Self {
        self.expiry_date = Some(expiry_date.into());
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_metadata(mut self, metadata: RecordMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_priority(mut self, priority: SyncPriority) -> Self {
        self.metadata.priority = Some(priority);
        self
    }

    pub fn is_flexvolt(&self) -> bool {
        self.metadata.product_type.as_deref() == Some(FLEXVOLT_PRODUCT_TYPE)
    }

    /// Parsed capacity, if the record is a FlexVolt battery with a valid one.
    pub fn flexvolt_capacity(&self) -> Option<FlexVoltCapacity> {
        if !self.is_flexvolt() {
            return None;
        }
        self.metadata.capacity.as_deref()?.parse().ok()
    }
}
