// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Phase classification of delivery dates.
//!
//! All date comparisons happen in the business timezone. Delivery datetimes
//! straddling midnight are compared by local date only.

use crate::error::DomainError;
use crate::status::FulfillmentStatus;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The single business timezone every date comparison happens in.
pub const BUSINESS_TIMEZONE: Tz = chrono_tz::America::Santiago;

/// Returns the local calendar date of `ts` in the business timezone.
#[must_use]
pub fn business_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&BUSINESS_TIMEZONE).date_naive()
}

/// Classifies a delivery timestamp into its time bucket.
///
/// Returns `Today` when the delivery date equals the current local date,
/// `Tomorrow` when it is the next local date, and `ThisWeekPlan` for every
/// other date. The planning bucket is the default for any future date, and
/// also for past dates; the caller decides whether a past delivery should
/// be archived instead.
#[must_use]
pub fn phase_of(delivery_ts: DateTime<Utc>, now: DateTime<Utc>) -> FulfillmentStatus {
    let today: NaiveDate = business_date(now);
    let delivery: NaiveDate = business_date(delivery_ts);
    if delivery == today {
        FulfillmentStatus::Today
    } else if today.succ_opt() == Some(delivery) {
        FulfillmentStatus::Tomorrow
    } else {
        FulfillmentStatus::ThisWeekPlan
    }
}

/// Parses a delivery datetime from wire input.
///
/// Accepts RFC 3339 with an explicit offset, or a naive
/// `YYYY-MM-DDTHH:MM[:SS]` value which is interpreted in the business
/// timezone. During a daylight-saving fold the earlier instant wins; inside
/// a spring-forward gap the input is rejected.
///
/// # Errors
///
/// Returns `DomainError::Validation` for unparseable input or a local time
/// that does not exist in the business timezone.
pub fn parse_delivery_datetime(input: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive: NaiveDateTime = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M"))
        .map_err(|_| DomainError::Validation {
            field: "delivery_at",
            reason: format!("unparseable datetime '{input}'"),
        })?;
    BUSINESS_TIMEZONE
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or(DomainError::Validation {
            field: "delivery_at",
            reason: format!("local time '{input}' does not exist in the business timezone"),
        })
}

/// Returns whether a dispatched order is due for archival.
///
/// Archival happens the day after delivery: the delivery date must be
/// strictly before the current local date.
#[must_use]
pub fn is_past_delivery(delivery_ts: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    business_date(delivery_ts) < business_date(now)
}

/// Adds a number of calendar days to a date, saturating at the calendar
/// bounds.
#[must_use]
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude: u64 = days.unsigned_abs();
    let shifted: Option<NaiveDate> = if days >= 0 {
        date.checked_add_days(Days::new(magnitude))
    } else {
        date.checked_sub_days(Days::new(magnitude))
    };
    shifted.unwrap_or(date)
}
