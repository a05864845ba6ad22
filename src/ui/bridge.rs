/// chrome.* access for the popup and reminder pages

use crate::entries::day_key;
use crate::router::{Request, Response};
use crate::storage::{EntriesByDay, DARK_MODE_KEY, ENTRIES_KEY};
use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/pages.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getAlarmTime(name: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = onStorageChanged)]
    pub fn on_storage_changed(callback: &js_sys::Function);

    #[wasm_bindgen(js_name = offStorageChanged)]
    pub fn off_storage_changed(callback: &js_sys::Function);

    #[wasm_bindgen(js_name = setDarkClass)]
    pub fn set_dark_class(enabled: bool);

    #[wasm_bindgen(js_name = confirmAction)]
    pub fn confirm_action(message: &str) -> bool;

    #[wasm_bindgen(js_name = closeWindow)]
    pub fn close_window();

    #[wasm_bindgen(js_name = exportToFile)]
    pub fn export_to_file(content: &str, filename: &str, mime: &str);
}

/// Ask the background worker to handle a request
pub async fn send_request(request: &Request) -> Result<Response, String> {
    let message = request
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize: {:?}", e))?;

    let response = sendMessage(message)
        .await
        .map_err(|e| format!("Failed to send message: {:?}", e))?;

    if response.is_null() || response.is_undefined() {
        return Err("background worker did not answer".to_string());
    }
    serde_wasm_bindgen::from_value(response).map_err(|e| format!("Failed to parse response: {:?}", e))
}

pub async fn load_entries() -> Result<EntriesByDay, String> {
    let entries_js = getStorage(ENTRIES_KEY)
        .await
        .map_err(|e| format!("Failed to get storage: {:?}", e))?;

    if entries_js.is_null() || entries_js.is_undefined() {
        return Ok(EntriesByDay::new());
    }
    let value: serde_json::Value =
        serde_wasm_bindgen::from_value(entries_js).map_err(|e| format!("Failed to parse storage: {:?}", e))?;
    Ok(EntriesByDay::from_value(&value).unwrap_or_default())
}

pub async fn load_dark_mode() -> Result<Option<bool>, String> {
    let value = getStorage(DARK_MODE_KEY)
        .await
        .map_err(|e| format!("Failed to get storage: {:?}", e))?;
    Ok(value.as_bool())
}

pub async fn save_dark_mode(enabled: bool) -> Result<(), String> {
    setStorage(DARK_MODE_KEY, JsValue::from_bool(enabled))
        .await
        .map_err(|e| format!("Failed to save storage: {:?}", e))
}

/// Next firing time of the alarm in epoch milliseconds
pub async fn next_alarm_time(name: &str) -> Result<Option<f64>, String> {
    let value = getAlarmTime(name)
        .await
        .map_err(|e| format!("Failed to get alarm: {:?}", e))?;
    Ok(value.as_f64())
}

/// Apply the stored theme to the current page
pub async fn apply_stored_theme() -> Option<bool> {
    match load_dark_mode().await {
        Ok(Some(enabled)) => {
            set_dark_class(enabled);
            Some(enabled)
        }
        Ok(None) => None,
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

/// The browser's current UTC offset
pub fn local_offset() -> FixedOffset {
    // getTimezoneOffset is UTC minus local, in minutes
    let minutes = js_sys::Date::new_0().get_timezone_offset();
    FixedOffset::west_opt((minutes * 60.0) as i32).unwrap_or_else(|| Utc.fix())
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub fn today_key() -> String {
    day_key(Utc::now())
}
