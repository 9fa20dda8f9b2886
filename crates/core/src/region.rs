//! Fixed warehouse region table.
//!
//! Exactly four regions exist. Their descriptors are compiled in and indexed by
//! [`Region`], so lookups are exhaustive at compile time and never hash strings.

use core::str::FromStr;

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Geographic zone a warehouse belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    Us,
    Japan,
    Eu,
    Australia,
}

/// Hemisphere, used for the seasonal demand adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Hemisphere {
    Northern,
    Southern,
}

/// Local working-hours window, `[start, end)` in whole hours.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingHours {
    pub start: u32,
    pub end: u32,
}

impl WorkingHours {
    pub fn contains_hour(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }
}

/// Static descriptor for one region.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseRegion {
    pub region: Region,
    /// IANA zone name, informational.
    pub timezone: &'static str,
    /// Standard-time UTC offset in seconds. Daylight saving is not modelled.
    pub utc_offset_secs: i32,
    pub currency: &'static str,
    pub working_hours: WorkingHours,
    #[serde(skip)]
    pub hemisphere: Hemisphere,
}

static REGIONS: [WarehouseRegion; 4] = [
    WarehouseRegion {
        region: Region::Us,
        timezone: "America/New_York",
        utc_offset_secs: -5 * 3600,
        currency: "USD",
        working_hours: WorkingHours { start: 8, end: 17 },
        hemisphere: Hemisphere::Northern,
    },
    WarehouseRegion {
        region: Region::Japan,
        timezone: "Asia/Tokyo",
        utc_offset_secs: 9 * 3600,
        currency: "JPY",
        working_hours: WorkingHours { start: 9, end: 18 },
        hemisphere: Hemisphere::Northern,
    },
    WarehouseRegion {
        region: Region::Eu,
        timezone: "Europe/Berlin",
        utc_offset_secs: 3600,
        currency: "EUR",
        working_hours: WorkingHours { start: 8, end: 17 },
        hemisphere: Hemisphere::Northern,
    },
    WarehouseRegion {
        region: Region::Australia,
        timezone: "Australia/Sydney",
        utc_offset_secs: 10 * 3600,
        currency: "AUD",
        working_hours: WorkingHours { start: 7, end: 16 },
        hemisphere: Hemisphere::Southern,
    },
];

impl Region {
    pub const ALL: [Region; 4] = [Region::Us, Region::Japan, Region::Eu, Region::Australia];

    const fn index(self) -> usize {
        match self {
            Region::Us => 0,
            Region::Japan => 1,
            Region::Eu => 2,
            Region::Australia => 3,
        }
    }

    pub fn descriptor(self) -> &'static WarehouseRegion {
        &REGIONS[self.index()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Japan => "JAPAN",
            Region::Eu => "EU",
            Region::Australia => "AUSTRALIA",
        }
    }

    /// Derive the region of a warehouse from its id.
    ///
    /// The leading token of the id (before the first `-` or `_`) selects the
    /// region. Unrecognised ids fall back to [`Region::Us`]; whether that should
    /// instead be an error is still pending product-owner confirmation.
    pub fn for_warehouse(warehouse_id: &str) -> Region {
        let token = warehouse_id
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match token.as_str() {
            "us" | "usa" => Region::Us,
            "japan" | "jp" => Region::Japan,
            "eu" | "europe" => Region::Eu,
            "australia" | "au" => Region::Australia,
            _ => {
                tracing::warn!(warehouse_id, "unknown warehouse id; defaulting to US region");
                Region::Us
            }
        }
    }

    /// Local time in this region (standard offset).
    pub fn local_time(self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(self.descriptor().utc_offset_secs)
            .unwrap_or_else(|| Utc.fix());
        now.with_timezone(&offset)
    }

    /// Whether `now` falls within this region's working hours.
    pub fn is_working_hours(self, now: DateTime<Utc>) -> bool {
        let hour = self.local_time(now).hour();
        self.descriptor().working_hours.contains_hour(hour)
    }
}

impl core::fmt::Display for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" | "USA" => Ok(Region::Us),
            "JAPAN" | "JP" => Ok(Region::Japan),
            "EU" | "EUROPE" => Ok(Region::Eu),
            "AUSTRALIA" | "AU" => Ok(Region::Australia),
            _ => Err(DomainError::unknown("region", s)),
        }
    }
}
