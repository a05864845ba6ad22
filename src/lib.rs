/// tomatoh - Chrome Extension that nudges you to log what you just got done
/// Built with Rust + WASM + Yew

pub mod background;
mod chrome;
pub mod config;
pub mod coordinator;
pub mod entries;
pub mod error;
pub mod export;
pub mod host;
pub mod router;
pub mod scheduler;
pub mod storage;
pub mod ui;

#[cfg(test)]
mod testing;

use background::Background;
use config::ReminderConfig;
use host::SystemClock;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

thread_local! {
    static BACKGROUND: Rc<Background> = {
        let config = ReminderConfig::default();
        let reminder_url = chrome::page_url(&config.reminder_page);
        Rc::new(Background::new(
            Rc::new(chrome::ChromeStorage),
            Rc::new(chrome::ChromeAlarms),
            Rc::new(chrome::ChromeWindows),
            Rc::new(SystemClock),
            config,
            reminder_url,
        ))
    };
}

fn background() -> Rc<Background> {
    BACKGROUND.with(Rc::clone)
}

// Service worker entry points. Each returns a promise so the JS glue can
// keep the worker alive until the handler is done.

#[wasm_bindgen]
pub fn handle_install() -> js_sys::Promise {
    let bg = background();
    future_to_promise(async move {
        log::info!("extension installed or updated");
        bg.on_start().await;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen]
pub fn handle_startup() -> js_sys::Promise {
    let bg = background();
    future_to_promise(async move {
        bg.on_start().await;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen]
pub fn handle_alarm(name: String) -> js_sys::Promise {
    let bg = background();
    future_to_promise(async move {
        bg.on_alarm(&name).await;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen]
pub fn handle_window_removed(window_id: i32) -> js_sys::Promise {
    let bg = background();
    future_to_promise(async move {
        bg.on_window_removed(window_id).await;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen]
pub fn handle_bounds_changed(window_id: i32) -> js_sys::Promise {
    let bg = background();
    future_to_promise(async move {
        bg.on_bounds_changed(window_id).await;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen]
pub fn handle_focus_changed(window_id: i32) -> js_sys::Promise {
    let bg = background();
    future_to_promise(async move {
        bg.on_focus_changed(window_id).await;
        Ok(JsValue::UNDEFINED)
    })
}

/// Resolves to the `{ success, ... }` response for a runtime message
#[wasm_bindgen]
pub fn handle_message(message: JsValue) -> js_sys::Promise {
    let bg = background();
    future_to_promise(async move {
        let message: serde_json::Value = serde_wasm_bindgen::from_value(message).unwrap_or_default();
        let response = bg.on_message(message).await;
        serde_wasm_bindgen::to_value(&response).map_err(|e| JsValue::from_str(&format!("{:?}", e)))
    })
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the reminder prompt window
#[wasm_bindgen]
pub fn start_reminder() {
    yew::Renderer::<ui::reminder::ReminderApp>::new().render();
}
