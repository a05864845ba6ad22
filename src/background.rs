/// Service worker event handling.
///
/// Each browser event maps to one method here. Failures are logged and
/// swallowed so a bad event never stops later ones from being handled.

use crate::config::ReminderConfig;
use crate::coordinator::ReminderCoordinator;
use crate::entries::EntryStore;
use crate::host::{AlarmScheduler, Clock, KeyValueStore, WindowId, WindowManager, WINDOW_ID_NONE};
use crate::router::{MessageRouter, Response};
use crate::scheduler::ReminderScheduler;
use serde_json::Value;
use std::rc::Rc;

pub struct Background {
    pub coordinator: Rc<ReminderCoordinator>,
    pub scheduler: Rc<ReminderScheduler>,
    pub router: MessageRouter,
    config: ReminderConfig,
}

impl Background {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        alarms: Rc<dyn AlarmScheduler>,
        windows: Rc<dyn WindowManager>,
        clock: Rc<dyn Clock>,
        config: ReminderConfig,
        reminder_url: String,
    ) -> Background {
        let coordinator = Rc::new(ReminderCoordinator::new(
            store.clone(),
            windows,
            config.clone(),
            reminder_url,
        ));
        let scheduler = Rc::new(ReminderScheduler::new(store.clone(), alarms, config.clone()));
        let entries = Rc::new(EntryStore::new(store.clone(), clock, config.clone()));
        let router = MessageRouter::new(
            store,
            coordinator.clone(),
            scheduler.clone(),
            entries,
            config.clone(),
        );

        Background {
            coordinator,
            scheduler,
            router,
            config,
        }
    }

    /// Install and startup both repair state and re-arm the alarm
    pub async fn on_start(&self) {
        if let Err(e) = self.scheduler.ensure_initialized().await {
            log::warn!("initialization failed: {}", e);
        }
    }

    pub async fn on_alarm(&self, name: &str) {
        if name != self.config.alarm_name {
            return;
        }
        if let Err(e) = self.coordinator.open_reminder_window().await {
            log::warn!("could not open reminder window: {}", e);
        }
    }

    pub async fn on_window_removed(&self, id: WindowId) {
        if let Err(e) = self.coordinator.on_window_removed(id).await {
            log::warn!("window removal handling failed: {}", e);
        }
    }

    pub async fn on_bounds_changed(&self, id: WindowId) {
        if let Err(e) = self.coordinator.on_bounds_changed(id).await {
            log::warn!("bounds enforcement failed: {}", e);
        }
    }

    pub async fn on_focus_changed(&self, id: WindowId) {
        if id == WINDOW_ID_NONE {
            return;
        }
        if let Err(e) = self.coordinator.on_focus_changed(id).await {
            log::warn!("focus handling failed: {}", e);
        }
    }

    pub async fn on_message(&self, message: Value) -> Response {
        self.router.dispatch(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::host::WindowState;
    use crate::storage::{ACTIVE_WINDOW_KEY, INTERVAL_KEY};
    use crate::testing::{FakeAlarms, FakeWindows, FixedClock, MemoryStore};
    use futures::executor::block_on;
    use serde_json::json;

    fn background(store: &Rc<MemoryStore>, alarms: &Rc<FakeAlarms>, windows: &Rc<FakeWindows>) -> Background {
        Background::new(
            store.clone(),
            alarms.clone(),
            windows.clone(),
            Rc::new(FixedClock::at(2024, 5, 1, 9, 30)),
            ReminderConfig::default(),
            "chrome-extension://tomatoh/reminder.html".to_string(),
        )
    }

    #[test]
    fn test_start_then_alarm_opens_window() {
        let store = Rc::new(MemoryStore::with(INTERVAL_KEY, json!(-5)));
        let alarms = Rc::new(FakeAlarms::default());
        let windows = Rc::new(FakeWindows::default());
        let bg = background(&store, &alarms, &windows);

        block_on(bg.on_start());
        assert_eq!(alarms.alarm("accomplishment-reminder").unwrap().period_minutes, 15.0);

        block_on(bg.on_alarm("accomplishment-reminder"));
        block_on(bg.on_alarm("accomplishment-reminder"));
        assert_eq!(windows.created_count(), 1);
    }

    #[test]
    fn test_foreign_alarm_ignored() {
        let store = Rc::new(MemoryStore::default());
        let alarms = Rc::new(FakeAlarms::default());
        let windows = Rc::new(FakeWindows::default());
        let bg = background(&store, &alarms, &windows);

        block_on(bg.on_alarm("something-else"));
        assert_eq!(windows.created_count(), 0);
    }

    #[test]
    fn test_alarm_failure_does_not_panic() {
        let store = Rc::new(MemoryStore::default());
        let alarms = Rc::new(FakeAlarms::default());
        let windows = Rc::new(FakeWindows::default());
        *windows.failure.borrow_mut() = Some(HostError::Js("boom".to_string()));
        let bg = background(&store, &alarms, &windows);

        block_on(bg.on_alarm("accomplishment-reminder"));
        block_on(bg.on_bounds_changed(1));

        // later events still work once the host recovers
        *windows.failure.borrow_mut() = None;
        block_on(bg.on_alarm("accomplishment-reminder"));
        assert_eq!(windows.created_count(), 1);
    }

    #[test]
    fn test_restart_then_close_clears_stored_window() {
        let store = Rc::new(MemoryStore::default());
        let alarms = Rc::new(FakeAlarms::default());
        let windows = Rc::new(FakeWindows::default());

        let first = background(&store, &alarms, &windows);
        block_on(first.on_alarm("accomplishment-reminder"));
        let id = store.value(ACTIVE_WINDOW_KEY).and_then(|v| v.as_i64()).unwrap() as WindowId;

        // service worker restarts: fresh in-memory state, same storage
        let second = background(&store, &alarms, &windows);
        windows.close(id);
        block_on(second.on_window_removed(id));

        assert_eq!(store.value(ACTIVE_WINDOW_KEY), None);
    }

    #[test]
    fn test_focus_none_is_ignored() {
        let store = Rc::new(MemoryStore::default());
        let alarms = Rc::new(FakeAlarms::default());
        let windows = Rc::new(FakeWindows::default());
        windows.insert(WINDOW_ID_NONE, 900, 900, WindowState::Maximized);
        store.put(ACTIVE_WINDOW_KEY, json!(WINDOW_ID_NONE));
        let bg = background(&store, &alarms, &windows);

        block_on(bg.on_focus_changed(WINDOW_ID_NONE));

        assert!(windows.updates.borrow().is_empty());
        assert_eq!(store.reads.get(), 0);
    }

    #[test]
    fn test_message_roundtrip() {
        let store = Rc::new(MemoryStore::default());
        let alarms = Rc::new(FakeAlarms::default());
        let windows = Rc::new(FakeWindows::default());
        let bg = background(&store, &alarms, &windows);

        let response = block_on(bg.on_message(json!({"type": "updateInterval", "minutes": 45})));
        assert_eq!(response, Response::with_minutes(45));
    }
}
