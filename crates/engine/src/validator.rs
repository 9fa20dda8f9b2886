//! Schema and business-rule validation of incoming sync records.
//!
//! Validation never fails as a call: every problem is returned as data. Hard
//! errors move a record to `invalid_records`; warnings are informational and
//! never block acceptance.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use stocksync_core::{ProductId, ProductSyncRecord, FLEXVOLT_PRODUCT_TYPE};

/// Expiry closer than this raises a warning.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Quantities above this raise a warning.
pub const HIGH_QUANTITY_THRESHOLD: i64 = 10_000;

/// Allowed difference between `cost` and the reference price.
const PRICE_TOLERANCE: f64 = 0.005;

/// Canonical hyphenated UUID text. Simple, braced and URN forms are rejected
/// so product ids compare equal to override and inventory keys.
static PRODUCT_ID_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("product id pattern is valid")
});

static LOCATION_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}-[0-9]{2}-[A-Z]{3}$").expect("location pattern is valid"));

/// A single problem with one field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A rejected record together with every hard error found on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidRecord {
    pub record: ProductSyncRecord,
    pub errors: Vec<FieldError>,
}

/// Informational finding; does not block acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub product_id: String,
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub warning_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncValidationResult {
    pub valid_records: Vec<ProductSyncRecord>,
    pub invalid_records: Vec<InvalidRecord>,
    pub warnings: Vec<ValidationWarning>,
    pub summary: ValidationSummary,
}

impl SyncValidationResult {
    pub fn is_clean(&self) -> bool {
        self.invalid_records.is_empty() && self.warnings.is_empty()
    }
}

/// Validate a list of records against `now`.
///
/// Deterministic: identical inputs (including `now`) yield identical output.
pub fn validate(records: &[ProductSyncRecord], now: DateTime<Utc>) -> SyncValidationResult {
    let mut result = SyncValidationResult::default();

    for record in records {
        let mut warnings = Vec::new();
        let outcome = check_schema(record)
            .and_then(|expiry| check_business(record, expiry, now, &mut warnings));

        result
            .warnings
            .extend(warnings.into_iter().map(|w| ValidationWarning {
                product_id: record.product_id.clone(),
                field: w.field,
                message: w.message,
            }));

        match outcome {
            Ok(()) => result.valid_records.push(record.clone()),
            Err(errors) => {
                tracing::debug!(
                    product_id = %record.product_id,
                    errors = errors.len(),
                    "rejected sync record"
                );
                result.invalid_records.push(InvalidRecord {
                    record: record.clone(),
                    errors,
                });
            }
        }
    }

    result.summary = ValidationSummary {
        total: records.len(),
        valid: result.valid_records.len(),
        invalid: result.invalid_records.len(),
        warning_count: result.warnings.len(),
    };

    tracing::info!(
        total = result.summary.total,
        valid = result.summary.valid,
        invalid = result.summary.invalid,
        warnings = result.summary.warning_count,
        "validated sync records"
    );

    result
}

/// Structural checks. On success yields the parsed expiry date, if any.
fn check_schema(record: &ProductSyncRecord) -> Result<Option<DateTime<Utc>>, Vec<FieldError>> {
    let mut errors = Vec::new();

    if !PRODUCT_ID_FORMAT.is_match(&record.product_id)
        || record.product_id.parse::<ProductId>().is_err()
    {
        errors.push(FieldError::new(
            "productId",
            format!("productId must be a valid UUID (got {:?})", record.product_id),
        ));
    }

    if record.quantity < 0 {
        errors.push(FieldError::new(
            "quantity",
            format!("quantity cannot be negative (got {})", record.quantity),
        ));
    }

    if let Some(cost) = record.cost {
        if !(cost.is_finite() && cost > 0.0) {
            errors.push(FieldError::new(
                "cost",
                format!("cost must be positive (got {cost})"),
            ));
        }
    }

    let expiry = match record.expiry_date.as_deref() {
        None => None,
        Some(raw) => match parse_timestamp(raw) {
            Some(ts) => Some(ts),
            None => {
                errors.push(FieldError::new(
                    "expiryDate",
                    format!("expiryDate must be an ISO-8601 timestamp (got {raw:?})"),
                ));
                None
            }
        },
    };

    if errors.is_empty() {
        Ok(expiry)
    } else {
        Err(errors)
    }
}

fn check_business(
    record: &ProductSyncRecord,
    expiry: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    warnings: &mut Vec<FieldError>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if record.is_flexvolt() {
        match (record.metadata.capacity.as_deref(), record.flexvolt_capacity()) {
            (None, _) => warnings.push(FieldError::new(
                "metadata.capacity",
                "FlexVolt battery has no capacity; price consistency not checked",
            )),
            (Some(raw), None) => errors.push(FieldError::new(
                "metadata.capacity",
                format!("invalid {FLEXVOLT_PRODUCT_TYPE} capacity {raw:?}; expected one of 6Ah, 9Ah, 15Ah"),
            )),
            (Some(_), Some(capacity)) => {
                let expected = f64::from(capacity.reference_price());
                if let Some(cost) = record.cost {
                    if (cost - expected).abs() > PRICE_TOLERANCE {
                        warnings.push(FieldError::new(
                            "cost",
                            format!(
                                "price mismatch for {capacity} FlexVolt battery: cost {cost} differs from expected price {expected}"
                            ),
                        ));
                    }
                }
            }
        }
    }

    if let Some(expiry) = expiry {
        if expiry < now {
            errors.push(FieldError::new(
                "expiryDate",
                format!("expiryDate {} is in the past", expiry.to_rfc3339()),
            ));
        } else if expiry - now <= Duration::days(EXPIRY_WARNING_DAYS) {
            warnings.push(FieldError::new(
                "expiryDate",
                format!(
                    "product expires within {EXPIRY_WARNING_DAYS} days ({})",
                    expiry.to_rfc3339()
                ),
            ));
        }
    }

    if record.quantity > HIGH_QUANTITY_THRESHOLD {
        warnings.push(FieldError::new(
            "quantity",
            format!(
                "unusually large quantity {} (above {HIGH_QUANTITY_THRESHOLD})",
                record.quantity
            ),
        ));
    }

    if let Some(location) = record.location.as_deref() {
        if !LOCATION_FORMAT.is_match(location) {
            warnings.push(FieldError::new(
                "location",
                format!("location {location:?} does not match format XX-##-XXX"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// RFC 3339 timestamps, or a bare `YYYY-MM-DD` date taken as midnight UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
