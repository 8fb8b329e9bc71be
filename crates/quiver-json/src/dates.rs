//! Date and time text formats for the JSON wire shape: RFC 3339 datetimes
//! (with a permissive fallback for offset-less values), `yyyy-mm-dd` dates,
//! `hh:mm:ss` times.

use quiver_abstractions::SerializationError;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");
pub(crate) const TIME_WRITE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
pub(crate) const TIME_PARSE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]");

pub(crate) fn parse_datetime(raw: &str) -> Result<OffsetDateTime, SerializationError> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(value);
    }
    // Offset-less payloads are read as UTC.
    PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| SerializationError::MalformedPayload(format!("invalid datetime `{raw}`")))
}

pub(crate) fn parse_date(raw: &str) -> Result<Date, SerializationError> {
    Date::parse(raw, DATE_FORMAT)
        .map_err(|_| SerializationError::MalformedPayload(format!("invalid date `{raw}`")))
}

pub(crate) fn parse_time(raw: &str) -> Result<Time, SerializationError> {
    Time::parse(raw, TIME_PARSE_FORMAT)
        .map_err(|_| SerializationError::MalformedPayload(format!("invalid time `{raw}`")))
}

pub(crate) fn format_datetime(value: OffsetDateTime) -> Result<String, SerializationError> {
    value
        .format(&Rfc3339)
        .map_err(|err| SerializationError::MalformedPayload(format!("unformattable datetime: {err}")))
}

pub(crate) fn format_date(value: Date) -> Result<String, SerializationError> {
    value
        .format(DATE_FORMAT)
        .map_err(|err| SerializationError::MalformedPayload(format!("unformattable date: {err}")))
}

pub(crate) fn format_time(value: Time) -> Result<String, SerializationError> {
    value
        .format(TIME_WRITE_FORMAT)
        .map_err(|err| SerializationError::MalformedPayload(format!("unformattable time: {err}")))
}
