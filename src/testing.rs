/// In-memory stand-ins for the browser APIs, used by unit tests

use crate::error::HostError;
use crate::host::{
    AlarmScheduler, Clock, CreateWindow, KeyValueStore, WindowId, WindowInfo, WindowManager, WindowState,
    WindowUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future that returns `Pending` once, so joined tasks interleave at each host call
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

async fn maybe_yield(enabled: bool) {
    if enabled {
        YieldNow { yielded: false }.await;
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub values: RefCell<BTreeMap<String, Value>>,
    pub reads: Cell<usize>,
    pub writes: Cell<usize>,
    /// Suspend once inside every call
    pub yield_calls: Cell<bool>,
}

impl MemoryStore {
    pub fn with(key: &str, value: Value) -> MemoryStore {
        let store = MemoryStore::default();
        store.values.borrow_mut().insert(key.to_string(), value);
        store
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: Value) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }
}

#[async_trait(?Send)]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        maybe_yield(self.yield_calls.get()).await;
        self.reads.set(self.reads.get() + 1);
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        maybe_yield(self.yield_calls.get()).await;
        self.writes.set(self.writes.get() + 1);
        self.put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), HostError> {
        maybe_yield(self.yield_calls.get()).await;
        self.writes.set(self.writes.get() + 1);
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeAlarm {
    pub delay_minutes: f64,
    pub period_minutes: f64,
}

#[derive(Default)]
pub struct FakeAlarms {
    pub alarms: RefCell<BTreeMap<String, FakeAlarm>>,
    pub cleared: Cell<usize>,
}

impl FakeAlarms {
    pub fn alarm(&self, name: &str) -> Option<FakeAlarm> {
        self.alarms.borrow().get(name).cloned()
    }
}

#[async_trait(?Send)]
impl AlarmScheduler for FakeAlarms {
    async fn clear(&self, name: &str) -> Result<bool, HostError> {
        self.cleared.set(self.cleared.get() + 1);
        Ok(self.alarms.borrow_mut().remove(name).is_some())
    }

    async fn create(&self, name: &str, delay_minutes: f64, period_minutes: f64) -> Result<(), HostError> {
        self.alarms.borrow_mut().insert(
            name.to_string(),
            FakeAlarm {
                delay_minutes,
                period_minutes,
            },
        );
        Ok(())
    }
}

/// Window manager that keeps windows in a map and records every call
pub struct FakeWindows {
    pub windows: RefCell<BTreeMap<WindowId, WindowInfo>>,
    pub updates: RefCell<Vec<(WindowId, WindowUpdate)>>,
    pub created: RefCell<Vec<CreateWindow>>,
    next_id: Cell<WindowId>,
    /// Size a created window actually gets, ignoring the requested one
    pub created_size: Cell<Option<(i32, i32)>>,
    /// Create succeeds but reports no id
    pub create_without_id: Cell<bool>,
    /// Every call fails with this error
    pub failure: RefCell<Option<HostError>>,
    /// Suspend once inside every call
    pub yield_calls: Cell<bool>,
}

impl Default for FakeWindows {
    fn default() -> Self {
        FakeWindows {
            windows: RefCell::new(BTreeMap::new()),
            updates: RefCell::new(Vec::new()),
            created: RefCell::new(Vec::new()),
            next_id: Cell::new(100),
            created_size: Cell::new(None),
            create_without_id: Cell::new(false),
            failure: RefCell::new(None),
            yield_calls: Cell::new(false),
        }
    }
}

impl FakeWindows {
    pub fn insert(&self, id: WindowId, width: i32, height: i32, state: WindowState) {
        self.windows.borrow_mut().insert(
            id,
            WindowInfo {
                id: Some(id),
                width: Some(width),
                height: Some(height),
                state: Some(state),
                focused: false,
            },
        );
    }

    /// Simulate the user closing a window
    pub fn close(&self, id: WindowId) {
        self.windows.borrow_mut().remove(&id);
    }

    pub fn info(&self, id: WindowId) -> Option<WindowInfo> {
        self.windows.borrow().get(&id).cloned()
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }

    pub fn updates_for(&self, id: WindowId) -> Vec<WindowUpdate> {
        self.updates
            .borrow()
            .iter()
            .filter(|(window_id, _)| *window_id == id)
            .map(|(_, update)| update.clone())
            .collect()
    }

    fn check_failure(&self) -> Result<(), HostError> {
        match self.failure.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl WindowManager for FakeWindows {
    async fn get(&self, id: WindowId) -> Result<WindowInfo, HostError> {
        maybe_yield(self.yield_calls.get()).await;
        self.check_failure()?;
        self.info(id).ok_or(HostError::NotFound)
    }

    async fn update(&self, id: WindowId, update: &WindowUpdate) -> Result<(), HostError> {
        maybe_yield(self.yield_calls.get()).await;
        self.check_failure()?;
        let mut windows = self.windows.borrow_mut();
        let window = windows.get_mut(&id).ok_or(HostError::NotFound)?;

        if let Some(state) = update.state {
            window.state = Some(state);
        }
        if let Some(focused) = update.focused {
            window.focused = focused;
        }
        if let Some(width) = update.width {
            window.width = Some(width);
        }
        if let Some(height) = update.height {
            window.height = Some(height);
        }
        self.updates.borrow_mut().push((id, update.clone()));
        Ok(())
    }

    async fn create(&self, options: &CreateWindow) -> Result<WindowInfo, HostError> {
        maybe_yield(self.yield_calls.get()).await;
        self.check_failure()?;
        self.created.borrow_mut().push(options.clone());

        if self.create_without_id.get() {
            return Ok(WindowInfo {
                id: None,
                width: None,
                height: None,
                state: None,
                focused: false,
            });
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let (width, height) = self.created_size.get().unwrap_or((options.width, options.height));
        let info = WindowInfo {
            id: Some(id),
            width: Some(width),
            height: Some(height),
            state: Some(options.state),
            focused: options.focused,
        };
        self.windows.borrow_mut().insert(id, info.clone());
        Ok(info)
    }
}

/// Clock frozen at a fixed instant unless advanced
pub struct FixedClock {
    pub now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> FixedClock {
        FixedClock {
            now: Cell::new(Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
