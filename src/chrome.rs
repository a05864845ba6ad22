/// chrome.* implementations of the host traits, used by the service worker

use crate::error::HostError;
use crate::host::{AlarmScheduler, CreateWindow, KeyValueStore, WindowId, WindowInfo, WindowManager, WindowUpdate};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/background_bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn storageGet(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageSet(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageRemove(key: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn alarmsClear(name: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn alarmsCreate(name: &str, delay_minutes: f64, period_minutes: f64) -> Result<(), JsValue>;

    /// Resolves to `null` when no window has this id
    #[wasm_bindgen(catch)]
    async fn windowsGet(id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn windowsUpdate(id: i32, options: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn windowsCreate(options: JsValue) -> Result<JsValue, JsValue>;

    fn extensionUrl(path: &str) -> String;
}

fn js_error(err: JsValue) -> HostError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    HostError::Js(message)
}

/// chrome.storage wants plain objects, not `Map`s
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, HostError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| HostError::Js(format!("Failed to serialize: {:?}", e)))
}

/// Absolute URL of a page bundled with the extension
pub fn page_url(path: &str) -> String {
    extensionUrl(path)
}

pub struct ChromeStorage;

#[async_trait(?Send)]
impl KeyValueStore for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        let value = storageGet(key).await.map_err(js_error)?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|e| HostError::Js(format!("Failed to parse {}: {:?}", key, e)))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        storageSet(key, to_js(&value)?).await.map_err(js_error)
    }

    async fn remove(&self, key: &str) -> Result<(), HostError> {
        storageRemove(key).await.map_err(js_error)
    }
}

pub struct ChromeAlarms;

#[async_trait(?Send)]
impl AlarmScheduler for ChromeAlarms {
    async fn clear(&self, name: &str) -> Result<bool, HostError> {
        let cleared = alarmsClear(name).await.map_err(js_error)?;
        Ok(cleared.as_bool().unwrap_or(false))
    }

    async fn create(&self, name: &str, delay_minutes: f64, period_minutes: f64) -> Result<(), HostError> {
        alarmsCreate(name, delay_minutes, period_minutes).await.map_err(js_error)
    }
}

/// Missing windows are detected by looking the id up, never by reading error text
pub struct ChromeWindows;

impl ChromeWindows {
    async fn lookup(&self, id: WindowId) -> Result<Option<WindowInfo>, HostError> {
        let info = windowsGet(id).await.map_err(js_error)?;
        if info.is_null() || info.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(info)
            .map(Some)
            .map_err(|e| HostError::Js(format!("Failed to parse window: {:?}", e)))
    }
}

#[async_trait(?Send)]
impl WindowManager for ChromeWindows {
    async fn get(&self, id: WindowId) -> Result<WindowInfo, HostError> {
        self.lookup(id).await?.ok_or(HostError::NotFound)
    }

    async fn update(&self, id: WindowId, update: &WindowUpdate) -> Result<(), HostError> {
        match windowsUpdate(id, to_js(update)?).await {
            Ok(()) => Ok(()),
            Err(err) => match self.lookup(id).await {
                Ok(None) => Err(HostError::NotFound),
                _ => Err(js_error(err)),
            },
        }
    }

    async fn create(&self, options: &CreateWindow) -> Result<WindowInfo, HostError> {
        let created = windowsCreate(to_js(options)?).await.map_err(js_error)?;
        serde_wasm_bindgen::from_value(created)
            .map_err(|e| HostError::Js(format!("Failed to parse window: {:?}", e)))
    }
}
