/// Runtime message protocol between the UI pages and the background worker

use crate::config::ReminderConfig;
use crate::coordinator::ReminderCoordinator;
use crate::entries::EntryStore;
use crate::error::TomatohError;
use crate::host::KeyValueStore;
use crate::scheduler::ReminderScheduler;
use crate::storage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;

pub const UNKNOWN_REQUEST: &str = "Unknown request.";

const REQUEST_TYPES: [&str; 5] = [
    "saveAccomplishment",
    "updateInterval",
    "resetEntries",
    "openReminder",
    "getInterval",
];

/// Requests, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    SaveAccomplishment {
        #[serde(default)]
        items: Vec<Value>,
    },
    UpdateInterval {
        #[serde(default)]
        minutes: Value,
    },
    ResetEntries,
    OpenReminder,
    GetInterval,
}

/// `{ success: true, ...data }` or `{ success: false, error }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Response {
        Response {
            success: true,
            ..Default::default()
        }
    }

    pub fn with_minutes(minutes: u32) -> Response {
        Response {
            success: true,
            minutes: Some(minutes),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Response {
        Response {
            success: false,
            minutes: None,
            error: Some(error.into()),
        }
    }
}

/// Accepts numbers and numeric strings, like a form field would send
fn requested_minutes(value: &Value) -> Option<f64> {
    let minutes = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    minutes.is_finite().then_some(minutes)
}

pub struct MessageRouter {
    store: Rc<dyn KeyValueStore>,
    coordinator: Rc<ReminderCoordinator>,
    scheduler: Rc<ReminderScheduler>,
    entries: Rc<EntryStore>,
    config: ReminderConfig,
}

impl MessageRouter {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        coordinator: Rc<ReminderCoordinator>,
        scheduler: Rc<ReminderScheduler>,
        entries: Rc<EntryStore>,
        config: ReminderConfig,
    ) -> MessageRouter {
        MessageRouter {
            store,
            coordinator,
            scheduler,
            entries,
            config,
        }
    }

    /// Handle a raw message. Never fails; errors become failure responses.
    pub async fn dispatch(&self, message: Value) -> Response {
        let request = match Request::deserialize(&message) {
            Ok(request) => request,
            Err(err) => {
                log::warn!("rejecting message: {}", err);
                let known = message
                    .get("type")
                    .and_then(Value::as_str)
                    .filter(|tag| REQUEST_TYPES.contains(tag));
                return match known {
                    Some(tag) => Response::failure(format!("malformed {} request: {}", tag, err)),
                    None => Response::failure(UNKNOWN_REQUEST),
                };
            }
        };

        match self.handle(request).await {
            Ok(response) => response,
            Err(err) => {
                if !matches!(err, TomatohError::Validation(_)) {
                    log::warn!("message handler failed: {}", err);
                }
                Response::failure(err.to_string())
            }
        }
    }

    pub async fn handle(&self, request: Request) -> Result<Response, TomatohError> {
        match request {
            Request::SaveAccomplishment { items } => {
                let items: Vec<&str> = items.iter().map(|item| item.as_str().unwrap_or("")).collect();
                self.entries.save_accomplishment(items.as_slice()).await?;
                Ok(Response::ok())
            }
            Request::UpdateInterval { minutes } => {
                let requested = requested_minutes(&minutes)
                    .ok_or_else(|| TomatohError::Validation("interval must be a number".to_string()))?;
                let minutes = self.config.clamp_interval(requested);
                storage::save_interval(self.store.as_ref(), minutes).await?;
                self.scheduler.schedule_reminder(minutes as f64).await?;
                Ok(Response::with_minutes(minutes))
            }
            Request::ResetEntries => {
                self.entries.reset_entries().await?;
                Ok(Response::ok())
            }
            Request::OpenReminder => {
                self.coordinator.open_reminder_window().await?;
                Ok(Response::ok())
            }
            Request::GetInterval => {
                let minutes = storage::load_interval(self.store.as_ref())
                    .await?
                    .map(|minutes| self.config.clamp_interval(minutes))
                    .unwrap_or(self.config.default_interval_minutes);
                Ok(Response::with_minutes(minutes))
            }
        }
    }
}
