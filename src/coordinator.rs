/// Reminder window coordinator
///
/// Keeps at most one reminder popup open, pinned to a fixed size in the
/// normal display state. The identity of that popup is persisted so a
/// restarted service worker can still find (or forget) it.

use crate::config::ReminderConfig;
use crate::error::{HostError, TomatohError};
use crate::host::{CreateWindow, KeyValueStore, WindowId, WindowInfo, WindowManager, WindowState, WindowUpdate};
use crate::storage::{window_id_from_value, ACTIVE_WINDOW_KEY};
use futures::lock::Mutex;
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;

/// What the coordinator knows about the active reminder window.
///
/// Starts `Unloaded`; the first lookup hydrates it from storage exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveWindow {
    Unloaded,
    Loaded(Option<WindowId>),
}

pub struct ReminderCoordinator {
    store: Rc<dyn KeyValueStore>,
    windows: Rc<dyn WindowManager>,
    config: ReminderConfig,
    /// Absolute URL of the reminder page
    reminder_url: String,
    active: Cell<ActiveWindow>,
    /// Held for a whole open so overlapping triggers share one window
    open_lock: Mutex<()>,
}

impl ReminderCoordinator {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        windows: Rc<dyn WindowManager>,
        config: ReminderConfig,
        reminder_url: String,
    ) -> ReminderCoordinator {
        ReminderCoordinator {
            store,
            windows,
            config,
            reminder_url,
            active: Cell::new(ActiveWindow::Unloaded),
            open_lock: Mutex::new(()),
        }
    }

    pub fn active_window(&self) -> ActiveWindow {
        self.active.get()
    }

    pub async fn resolve_active_window_id(&self) -> Result<Option<WindowId>, TomatohError> {
        match self.active.get() {
            ActiveWindow::Loaded(id) => Ok(id),
            ActiveWindow::Unloaded => {
                let stored = self.store.get(ACTIVE_WINDOW_KEY).await?;
                // another task may have set the id while the read was pending
                if let ActiveWindow::Loaded(current) = self.active.get() {
                    return Ok(current);
                }
                let id = stored.as_ref().and_then(window_id_from_value);
                log::debug!("hydrated active reminder window: {:?}", id);
                self.active.set(ActiveWindow::Loaded(id));
                Ok(id)
            }
        }
    }

    pub async fn set_active_window_id(&self, id: Option<WindowId>) -> Result<(), TomatohError> {
        self.active.set(ActiveWindow::Loaded(id));
        match id {
            Some(id) => self.store.set(ACTIVE_WINDOW_KEY, Value::from(id)).await?,
            None => self.store.remove(ACTIVE_WINDOW_KEY).await?,
        }
        Ok(())
    }

    /// Snap a window back to the normal state and the fixed prompt size.
    ///
    /// Returns `false` if the window is gone; other host errors propagate.
    pub async fn ensure_window_bounds(&self, id: WindowId, focus: bool) -> Result<bool, TomatohError> {
        match self.normalize_window(id, focus).await {
            Ok(found) => Ok(found),
            Err(HostError::NotFound) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn normalize_window(&self, id: WindowId, focus: bool) -> Result<bool, HostError> {
        let Some(mut info) = self.fetch_window(id).await? else {
            return Ok(false);
        };

        let mut state_update = WindowUpdate::default();
        if info.state != Some(WindowState::Normal) {
            state_update.state = Some(WindowState::Normal);
        }
        if focus {
            state_update.focused = Some(true);
        }

        let mut focus_sent = false;
        if self.apply_update(id, &state_update).await? {
            focus_sent = focus;
            // leaving fullscreen/maximized can reset the size
            match self.fetch_window(id).await? {
                Some(refreshed) => info = refreshed,
                None => return Ok(false),
            }
        }

        let mut size_update = WindowUpdate::default();
        if info.width != Some(self.config.window_width) {
            size_update.width = Some(self.config.window_width);
        }
        if info.height != Some(self.config.window_height) {
            size_update.height = Some(self.config.window_height);
        }
        if focus && !focus_sent && !size_update.is_empty() {
            size_update.focused = Some(true);
            focus_sent = true;
        }
        self.apply_update(id, &size_update).await?;

        if focus && !focus_sent {
            let focus_update = WindowUpdate {
                focused: Some(true),
                ..Default::default()
            };
            self.apply_update(id, &focus_update).await?;
        }

        Ok(true)
    }

    async fn fetch_window(&self, id: WindowId) -> Result<Option<WindowInfo>, HostError> {
        match self.windows.get(id).await {
            Ok(info) => Ok(Some(info)),
            Err(HostError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn apply_update(&self, id: WindowId, update: &WindowUpdate) -> Result<bool, HostError> {
        if update.is_empty() {
            return Ok(false);
        }
        self.windows.update(id, update).await?;
        Ok(true)
    }

    /// Show the reminder prompt, reusing the open popup when there is one
    pub async fn open_reminder_window(&self) -> Result<(), TomatohError> {
        let _guard = self.open_lock.lock().await;
        if let Some(existing) = self.resolve_active_window_id().await? {
            if self.ensure_window_bounds(existing, true).await? {
                log::debug!("reusing reminder window {}", existing);
                return Ok(());
            }
            log::info!("reminder window {} is gone, creating a new one", existing);
            self.set_active_window_id(None).await?;
        }

        let options = CreateWindow::popup(&self.reminder_url, self.config.window_width, self.config.window_height);
        let created = self.windows.create(&options).await?;

        match created.id {
            Some(id) => {
                self.set_active_window_id(Some(id)).await?;
                // some window managers ignore the requested size or state
                if !self.ensure_window_bounds(id, true).await? {
                    log::info!("reminder window {} vanished right after creation", id);
                    self.set_active_window_id(None).await?;
                }
            }
            None => {
                log::warn!("reminder window was created without an id");
                self.set_active_window_id(None).await?;
            }
        }
        Ok(())
    }

    pub async fn on_window_removed(&self, id: WindowId) -> Result<(), TomatohError> {
        let active = match self.active.get() {
            ActiveWindow::Loaded(active) => active,
            ActiveWindow::Unloaded => self.resolve_active_window_id().await?,
        };
        if active == Some(id) {
            log::debug!("reminder window {} closed", id);
            self.set_active_window_id(None).await?;
        }
        Ok(())
    }

    pub async fn on_bounds_changed(&self, id: WindowId) -> Result<(), TomatohError> {
        if self.resolve_active_window_id().await? == Some(id) {
            self.ensure_window_bounds(id, false).await?;
        }
        Ok(())
    }

    /// Returning focus can restore an OS-level fullscreen without a bounds event
    pub async fn on_focus_changed(&self, id: WindowId) -> Result<(), TomatohError> {
        if self.resolve_active_window_id().await? == Some(id) {
            self.ensure_window_bounds(id, false).await?;
        }
        Ok(())
    }
}
