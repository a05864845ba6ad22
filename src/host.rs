/// Browser collaborators the background worker talks to.
///
/// Everything behind these traits is awaited on the single-threaded wasm
/// event loop, so none of the futures are `Send`.

use crate::error::HostError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type WindowId = i32;

/// Chrome reports `-1` from `windows.onFocusChanged` when no window has focus
pub const WINDOW_ID_NONE: WindowId = -1;

/// Display state of a browser window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
    LockedFullscreen,
    Other,
}

impl From<String> for WindowState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "normal" => WindowState::Normal,
            "minimized" => WindowState::Minimized,
            "maximized" => WindowState::Maximized,
            "fullscreen" => WindowState::Fullscreen,
            "locked-fullscreen" => WindowState::LockedFullscreen,
            _ => WindowState::Other,
        }
    }
}

impl From<WindowState> for String {
    fn from(state: WindowState) -> Self {
        match state {
            WindowState::Normal => "normal",
            WindowState::Minimized => "minimized",
            WindowState::Maximized => "maximized",
            WindowState::Fullscreen => "fullscreen",
            WindowState::LockedFullscreen => "locked-fullscreen",
            // never sent to the browser
            WindowState::Other => "normal",
        }
        .to_string()
    }
}

/// The subset of `chrome.windows.Window` the coordinator reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    #[serde(default)]
    pub id: Option<WindowId>,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub state: Option<WindowState>,
    #[serde(default)]
    pub focused: bool,
}

/// Options for `chrome.windows.update`; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<WindowState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
}

impl WindowUpdate {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.focused.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// Options for `chrome.windows.create`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWindow {
    pub url: String,
    #[serde(rename = "type")]
    pub window_type: String,
    pub focused: bool,
    pub width: i32,
    pub height: i32,
    pub state: WindowState,
}

impl CreateWindow {
    pub fn popup(url: &str, width: i32, height: i32) -> CreateWindow {
        CreateWindow {
            url: url.to_string(),
            window_type: "popup".to_string(),
            focused: true,
            width,
            height,
            state: WindowState::Normal,
        }
    }
}

/// Durable extension-local key-value storage
#[async_trait(?Send)]
pub trait KeyValueStore {
    /// Read one key; `None` when it was never written or has been removed
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError>;

    async fn remove(&self, key: &str) -> Result<(), HostError>;
}

/// Named recurring timers
#[async_trait(?Send)]
pub trait AlarmScheduler {
    /// Returns whether an alarm was actually cleared
    async fn clear(&self, name: &str) -> Result<bool, HostError>;

    async fn create(&self, name: &str, delay_minutes: f64, period_minutes: f64) -> Result<(), HostError>;
}

/// On-screen browser windows.
///
/// Implementations must report a window that no longer exists as
/// [`HostError::NotFound`] from both `get` and `update`.
#[async_trait(?Send)]
pub trait WindowManager {
    async fn get(&self, id: WindowId) -> Result<WindowInfo, HostError>;

    async fn update(&self, id: WindowId, update: &WindowUpdate) -> Result<(), HostError>;

    async fn create(&self, options: &CreateWindow) -> Result<WindowInfo, HostError>;
}

/// Source of capture-time timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
