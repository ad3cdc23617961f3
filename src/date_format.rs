//! Serde formats for dates on the wire.
//!
//! Dates are written as `YYYY-MM-DD` and timestamps as RFC 3339 strings, e.g.
//! `2025-07-01T00:00:00Z`.

use time::format_description::BorrowedFormatItem;

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");

/// The `YYYY-MM-DD` format used for dates in forms and query strings.
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    time::macros::format_description!("[year]-[month]-[day]");

pub(crate) use time::serde::rfc3339 as timestamp;
