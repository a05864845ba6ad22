/// Storage layout and serialization utilities for chrome.storage.local

use crate::error::TomatohError;
use crate::host::{KeyValueStore, WindowId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const ENTRIES_KEY: &str = "entries";
pub const INTERVAL_KEY: &str = "reminderIntervalMinutes";
pub const ACTIVE_WINDOW_KEY: &str = "activeReminderWindowId";
pub const DARK_MODE_KEY: &str = "darkMode";

/// A single logged accomplishment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// ISO-8601 capture time, UTC
    pub timestamp: String,
    pub note: String,
}

/// Root entry structure: `YYYY-MM-DD` day key to notes in append order.
///
/// A day key is only present while its list is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntriesByDay {
    pub days: BTreeMap<String, Vec<Entry>>,
}

impl EntriesByDay {
    pub fn new() -> Self {
        EntriesByDay {
            days: BTreeMap::new(),
        }
    }

    /// Decode a stored map for display. Anything that isn't a JSON object is
    /// rejected; unreadable entries are skipped, and days left empty dropped.
    pub fn from_value(value: &Value) -> Option<EntriesByDay> {
        let object = value.as_object()?;
        let days = object
            .iter()
            .filter_map(|(day, list)| {
                let entries: Vec<Entry> = list
                    .as_array()?
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect();
                if entries.is_empty() {
                    None
                } else {
                    Some((day.clone(), entries))
                }
            })
            .collect();
        Some(EntriesByDay { days })
    }

    pub fn day(&self, day: &str) -> &[Entry] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// A day's entries ordered for display, latest first
    pub fn newest_first(&self, day: &str) -> Vec<Entry> {
        let mut entries = self.day(day).to_vec();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Read a window id, accepting integral floats since JS numbers may arrive that way
pub fn window_id_from_value(value: &Value) -> Option<WindowId> {
    if let Some(id) = value.as_i64() {
        return WindowId::try_from(id).ok();
    }
    value
        .as_f64()
        .filter(|v| v.fract() == 0.0 && *v >= WindowId::MIN as f64 && *v <= WindowId::MAX as f64)
        .map(|v| v as WindowId)
}

/// Read an interval; only finite positive numbers count
pub fn interval_from_value(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite() && *v > 0.0)
}

/// Append to one day's stored list. Other days, and entries this crate
/// can't read, are written back exactly as they were stored.
pub async fn append_entries(store: &dyn KeyValueStore, day: &str, entries: &[Entry]) -> Result<(), TomatohError> {
    let mut map = match store.get(ENTRIES_KEY).await? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let mut list = match map.remove(day) {
        Some(Value::Array(list)) => list,
        _ => Vec::new(),
    };
    for entry in entries {
        list.push(serde_json::to_value(entry)?);
    }
    map.insert(day.to_string(), Value::Array(list));
    store.set(ENTRIES_KEY, Value::Object(map)).await?;
    Ok(())
}

pub async fn save_entries(store: &dyn KeyValueStore, entries: &EntriesByDay) -> Result<(), TomatohError> {
    store.set(ENTRIES_KEY, serde_json::to_value(entries)?).await?;
    Ok(())
}

pub async fn load_interval(store: &dyn KeyValueStore) -> Result<Option<f64>, TomatohError> {
    Ok(store
        .get(INTERVAL_KEY)
        .await?
        .as_ref()
        .and_then(interval_from_value))
}

pub async fn save_interval(store: &dyn KeyValueStore, minutes: u32) -> Result<(), TomatohError> {
    store.set(INTERVAL_KEY, Value::from(minutes)).await?;
    Ok(())
}
