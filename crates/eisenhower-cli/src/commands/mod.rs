pub mod config;
pub mod day;
pub mod task;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Parse an RFC 3339 timestamp or a local `YYYY-MM-DD` (midnight).
pub fn parse_when(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let day = parse_day(value)?;
    local_at(day, NaiveTime::MIN)
}

pub fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("invalid date '{value}': {e}"))
}

pub fn parse_clock(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| format!("invalid time '{value}': {e}"))
}

/// Wall-clock `time` on `day` in the local zone.
pub fn local_at(day: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, String> {
    Local
        .from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("{day} {time} does not exist in the local time zone"))
}

/// `--day` if given, otherwise today.
pub fn day_or_today(day: Option<&str>, now: &DateTime<Local>) -> Result<NaiveDate, String> {
    day.map_or_else(|| Ok(now.date_naive()), parse_day)
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
