/// Reminder alarm scheduling and startup self-repair

use crate::config::ReminderConfig;
use crate::error::TomatohError;
use crate::host::{AlarmScheduler, KeyValueStore};
use crate::storage::{interval_from_value, EntriesByDay, ENTRIES_KEY, INTERVAL_KEY};
use serde_json::Value;
use std::rc::Rc;

pub struct ReminderScheduler {
    store: Rc<dyn KeyValueStore>,
    alarms: Rc<dyn AlarmScheduler>,
    config: ReminderConfig,
}

impl ReminderScheduler {
    pub fn new(store: Rc<dyn KeyValueStore>, alarms: Rc<dyn AlarmScheduler>, config: ReminderConfig) -> Self {
        ReminderScheduler { store, alarms, config }
    }

    /// (Re)arm the reminder alarm so it first fires, then repeats, every `minutes`.
    ///
    /// Only the lower bound is enforced here; callers clamp the upper one.
    pub async fn schedule_reminder(&self, minutes: f64) -> Result<(), TomatohError> {
        let minutes = if minutes.is_finite() {
            minutes
        } else {
            self.config.default_interval_minutes as f64
        };
        let interval = minutes.max(self.config.min_interval_minutes as f64);

        self.alarms.clear(&self.config.alarm_name).await?;
        self.alarms.create(&self.config.alarm_name, interval, interval).await?;
        log::info!("reminder scheduled every {} minutes", interval);
        Ok(())
    }

    /// Repair whatever persisted state is missing or corrupt, then re-arm the alarm.
    ///
    /// Runs on install and on every service worker start. Returns the interval in effect.
    pub async fn ensure_initialized(&self) -> Result<f64, TomatohError> {
        let stored_interval = self.store.get(INTERVAL_KEY).await?;
        let stored_entries = self.store.get(ENTRIES_KEY).await?;

        let interval = match stored_interval.as_ref().and_then(interval_from_value) {
            Some(interval) => interval,
            None => {
                log::info!("resetting reminder interval to {} minutes", self.config.default_interval_minutes);
                self.store
                    .set(INTERVAL_KEY, Value::from(self.config.default_interval_minutes))
                    .await?;
                self.config.default_interval_minutes as f64
            }
        };

        if !matches!(stored_entries, Some(Value::Object(_))) {
            log::info!("resetting missing or malformed entries");
            self.store
                .set(ENTRIES_KEY, serde_json::to_value(EntriesByDay::new())?)
                .await?;
        }

        self.schedule_reminder(interval).await?;
        Ok(interval)
    }
}
