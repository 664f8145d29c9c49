//! Calendar formats shared by the REST payloads and the persisted documents.

use serde::Serializer;
use time::{Date, Time, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
/// Clients frequently send times without seconds (`19:30`).
const SHORT_TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| "invalid-date".into())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value.trim(), DATE_FORMAT)
}

/// Render a time of day as `HH:MM:SS`.
pub fn format_time(time: Time) -> String {
    time.format(TIME_FORMAT)
        .unwrap_or_else(|_| "invalid-time".into())
}

/// Parse a time of day, accepting both `HH:MM:SS` and `HH:MM`.
pub fn parse_time(value: &str) -> Result<Time, time::error::Parse> {
    let value = value.trim();
    Time::parse(value, TIME_FORMAT).or_else(|_| Time::parse(value, SHORT_TIME_FORMAT))
}

/// Serializer for [`Date`] fields.
pub fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}

/// Serializer for [`Time`] fields.
pub fn serialize_time<S: Serializer>(time: &Time, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_time(*time))
}
