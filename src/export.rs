/// JSON and CSV exports of the accomplishment log

use crate::storage::EntriesByDay;
use chrono::{DateTime, FixedOffset};

/// `accomplishments-2024-05-01.csv`
pub fn export_filename(day: &str, extension: &str) -> String {
    format!("accomplishments-{}.{}", day, extension)
}

pub fn to_json(entries: &EntriesByDay) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

/// Clock time like `9:05 AM` in the given offset.
///
/// Unparseable timestamps come back unchanged.
pub fn clock_time(timestamp: &str, offset: FixedOffset) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(at) => at.with_timezone(&offset).format("%-I:%M %p").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// One quoted `date,time,note` row per entry, CRLF separated
pub fn to_csv(entries: &EntriesByDay, offset: FixedOffset) -> String {
    let mut rows = vec![["date", "time", "note"].map(quote).join(",")];

    for (day, list) in &entries.days {
        for entry in list {
            let time = clock_time(&entry.timestamp, offset);
            rows.push([quote(day), quote(&time), quote(&entry.note)].join(","));
        }
    }

    rows.join("\r\n")
}
