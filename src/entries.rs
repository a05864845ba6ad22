/// Accomplishment log: validation, append and reset

use crate::config::ReminderConfig;
use crate::error::TomatohError;
use crate::host::{Clock, KeyValueStore};
use crate::storage::{self, EntriesByDay, Entry};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use futures::lock::Mutex;
use std::rc::Rc;

pub const EMPTY_SAVE_ERROR: &str = "please add at least one accomplishment.";

/// Day key for a capture time, `YYYY-MM-DD` in UTC
pub fn day_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// ISO-8601 with milliseconds and a `Z` suffix
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Trim, drop blanks, cap the count and length of submitted notes
pub fn sanitize_notes<S: AsRef<str>>(items: &[S], config: &ReminderConfig) -> Vec<String> {
    items
        .iter()
        .map(|item| item.as_ref().trim())
        .filter(|note| !note.is_empty())
        .take(config.max_notes_per_save)
        .map(|note| note.chars().take(config.max_note_chars).collect::<String>().trim_end().to_string())
        .collect()
}

pub struct EntryStore {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    config: ReminderConfig,
    /// Serializes read-modify-write of the entry map
    write_lock: Mutex<()>,
}

impl EntryStore {
    pub fn new(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>, config: ReminderConfig) -> EntryStore {
        EntryStore {
            store,
            clock,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Append up to three notes to today's list. Returns the stored entries.
    pub async fn save_accomplishment<S: AsRef<str>>(&self, items: &[S]) -> Result<Vec<Entry>, TomatohError> {
        let notes = sanitize_notes(items, &self.config);
        if notes.is_empty() {
            return Err(TomatohError::Validation(EMPTY_SAVE_ERROR.to_string()));
        }

        let _guard = self.write_lock.lock().await;

        let start = self.clock.now();
        let day = day_key(start);
        let mut last: Option<DateTime<Utc>> = None;
        let new_entries: Vec<Entry> = notes
            .into_iter()
            .map(|note| {
                // keep timestamps strictly increasing within one save
                let mut at = self.clock.now();
                if let Some(previous) = last {
                    if at <= previous {
                        at = previous + Duration::milliseconds(1);
                    }
                }
                last = Some(at);
                Entry {
                    timestamp: timestamp(at),
                    note,
                }
            })
            .collect();

        storage::append_entries(self.store.as_ref(), &day, &new_entries).await?;
        log::debug!("saved {} accomplishment(s) for {}", new_entries.len(), day);
        Ok(new_entries)
    }

    /// Drop every saved entry. Confirmation happens in the UI.
    pub async fn reset_entries(&self) -> Result<(), TomatohError> {
        let _guard = self.write_lock.lock().await;
        storage::save_entries(self.store.as_ref(), &EntriesByDay::new()).await?;
        log::info!("entries reset");
        Ok(())
    }
}
