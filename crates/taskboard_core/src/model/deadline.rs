use crate::error::AppError;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const DATE_TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
];

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses a stored RFC 3339 timestamp.
pub fn parse_instant(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value.trim(), &Rfc3339).ok()
}

/// Turns user-supplied deadline text into the RFC 3339 UTC form that is stored.
///
/// Local wall-clock forms (`2025-12-25 10:00`, `2025-12-25`) are read in `offset`.
pub fn normalize_deadline(raw: &str, offset: UtcOffset) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("deadline is required"));
    }

    let instant = parse_deadline_input(trimmed, offset).ok_or_else(|| {
        AppError::invalid_input(
            "deadline must be RFC3339, YYYY-MM-DD HH:MM[:SS] or YYYY-MM-DD",
        )
    })?;

    instant
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

fn parse_deadline_input(value: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    if let Some(instant) = parse_instant(value) {
        return Some(instant);
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(local) = PrimitiveDateTime::parse(value, *format) {
            return Some(local.assume_offset(offset));
        }
    }

    Date::parse(value, DATE_FORMAT)
        .ok()
        .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(offset))
}
