/// Popup UI: log a win, tune the reminder, export or reset

use crate::config::{ALARM_NAME, DEFAULT_INTERVAL_MINUTES};
use crate::export::{export_filename, to_csv, to_json};
use crate::router::Request;
use crate::storage::{Entry, DARK_MODE_KEY, ENTRIES_KEY, INTERVAL_KEY};
use crate::ui::bridge;
use crate::ui::components::{EntryList, ExportPanel, ReminderSettings};
use chrono::{DateTime, FixedOffset};
use gloo_timers::callback::Interval;
use patternfly_yew::prelude::*;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

/// How often the countdown refreshes
const COUNTDOWN_POLL_MS: u32 = 10_000;
const NOTHING_TO_EXPORT: &str = "nothing to export yet";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pane {
    Log,
    Reminders,
    Exports,
}

impl Pane {
    const ALL: [Pane; 3] = [Pane::Log, Pane::Reminders, Pane::Exports];

    fn label(self) -> &'static str {
        match self {
            Pane::Log => "📝 log",
            Pane::Reminders => "⏱ reminders",
            Pane::Exports => "📤 exports",
        }
    }

    fn index(self) -> usize {
        Pane::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    fn prev(self) -> Pane {
        Pane::ALL[self.index().saturating_sub(1)]
    }

    fn next(self) -> Pane {
        Pane::ALL[(self.index() + 1).min(Pane::ALL.len() - 1)]
    }
}

/// Human countdown to the next reminder
fn countdown_label(scheduled_ms: Option<f64>, now_ms: f64, offset: FixedOffset) -> String {
    let Some(scheduled) = scheduled_ms else {
        return "reminder will schedule soon".to_string();
    };
    let diff = scheduled - now_ms;
    if diff <= 0.0 {
        return "next nudge is arriving".to_string();
    }

    let minutes = (diff / 60_000.0).floor() as u64;
    let seconds = ((diff % 60_000.0) / 1000.0).floor() as u64;
    match DateTime::from_timestamp_millis(scheduled as i64) {
        Some(at) => format!(
            "next in {}m {}s · about {}",
            minutes,
            seconds,
            at.with_timezone(&offset).format("%-I:%M %p")
        ),
        None => format!("next in {}m {}s", minutes, seconds),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let entries = use_state(Vec::<Entry>::new);
    let draft = use_state(String::new);
    let interval = use_state(|| DEFAULT_INTERVAL_MINUTES.to_string());
    let save_status = use_state(|| None::<String>);
    let interval_status = use_state(|| None::<String>);
    let export_status = use_state(|| None::<String>);
    let next_reminder = use_state(|| "loading reminder schedule…".to_string());
    let saving_entry = use_state(|| false);
    let saving_interval = use_state(|| false);
    let export_busy = use_state(|| false);
    let dark_mode = use_state(|| false);
    let pane = use_state(|| Pane::Log);
    let offset = use_memo((), |_| bridge::local_offset());

    // Initial load, countdown polling and live refresh on storage changes
    {
        let entries = entries.clone();
        let interval = interval.clone();
        let next_reminder = next_reminder.clone();
        let dark_mode = dark_mode.clone();
        let offset = *offset;

        use_effect_with((), move |_| {
            refresh_entries(entries.clone());
            refresh_interval(interval.clone());
            refresh_countdown(next_reminder.clone(), offset);
            refresh_dark_mode(dark_mode.clone());

            let poll = {
                let next_reminder = next_reminder.clone();
                Interval::new(COUNTDOWN_POLL_MS, move || refresh_countdown(next_reminder.clone(), offset))
            };

            let listener = Closure::<dyn Fn(JsValue)>::new(move |keys: JsValue| {
                let keys: Vec<String> = serde_wasm_bindgen::from_value(keys).unwrap_or_default();
                let changed = |key: &str| keys.iter().any(|k| k == key);

                if changed(ENTRIES_KEY) {
                    refresh_entries(entries.clone());
                }
                if changed(INTERVAL_KEY) {
                    refresh_interval(interval.clone());
                    refresh_countdown(next_reminder.clone(), offset);
                }
                if changed(DARK_MODE_KEY) {
                    refresh_dark_mode(dark_mode.clone());
                }
            });
            bridge::on_storage_changed(listener.as_ref().unchecked_ref());

            move || {
                bridge::off_storage_changed(listener.as_ref().unchecked_ref());
                drop(listener);
                drop(poll);
            }
        });
    }

    let on_toggle_dark = {
        let dark_mode = dark_mode.clone();
        Callback::from(move |_| {
            let enabled = !*dark_mode;
            dark_mode.set(enabled);
            bridge::set_dark_class(enabled);
            spawn_local(async move {
                if let Err(e) = bridge::save_dark_mode(enabled).await {
                    log::warn!("{}", e);
                }
            });
        })
    };

    let on_draft_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlTextAreaElement>() {
                draft.set(input.value());
            }
        })
    };

    let on_save_entry = {
        let draft = draft.clone();
        let entries = entries.clone();
        let save_status = save_status.clone();
        let saving_entry = saving_entry.clone();

        Callback::from(move |_| {
            let note = draft.trim().to_string();
            if note.is_empty() {
                save_status.set(Some("write smth!".to_string()));
                return;
            }

            let draft = draft.clone();
            let entries = entries.clone();
            let save_status = save_status.clone();
            let saving_entry = saving_entry.clone();

            saving_entry.set(true);
            save_status.set(Some("saving…".to_string()));

            spawn_local(async move {
                let request = Request::SaveAccomplishment {
                    items: vec![Value::from(note)],
                };
                match bridge::send_request(&request).await {
                    Ok(response) if response.success => {
                        save_status.set(Some("saved ✨".to_string()));
                        draft.set(String::new());
                        refresh_entries(entries);
                    }
                    Ok(response) => {
                        save_status.set(Some(response.error.unwrap_or_else(|| "could not save yet".to_string())));
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                        save_status.set(Some("could not save yet".to_string()));
                    }
                }
                saving_entry.set(false);
            });
        })
    };

    let on_interval_input = {
        let interval = interval.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                interval.set(input.value());
            }
        })
    };

    let on_save_interval = {
        let interval = interval.clone();
        let interval_status = interval_status.clone();
        let saving_interval = saving_interval.clone();
        let next_reminder = next_reminder.clone();
        let offset = *offset;

        Callback::from(move |_| {
            let minutes = match interval.trim().parse::<f64>() {
                Ok(minutes) if minutes.is_finite() && minutes >= 1.0 => minutes,
                _ => {
                    interval_status.set(Some("interval must be at least one minute".to_string()));
                    return;
                }
            };

            let interval = interval.clone();
            let interval_status = interval_status.clone();
            let saving_interval = saving_interval.clone();
            let next_reminder = next_reminder.clone();

            saving_interval.set(true);
            interval_status.set(Some("saving…".to_string()));

            spawn_local(async move {
                let request = Request::UpdateInterval {
                    minutes: Value::from(minutes),
                };
                match bridge::send_request(&request).await {
                    Ok(response) if response.success => {
                        if let Some(saved) = response.minutes {
                            interval.set(saved.to_string());
                        }
                        interval_status.set(Some("interval updated".to_string()));
                        refresh_countdown(next_reminder, offset);
                    }
                    Ok(_) => interval_status.set(Some("could not update interval".to_string())),
                    Err(e) => {
                        log::warn!("{}", e);
                        interval_status.set(Some("could not update interval".to_string()));
                    }
                }
                saving_interval.set(false);
            });
        })
    };

    let on_open_reminder = Callback::from(move |_| {
        spawn_local(async move {
            if let Err(e) = bridge::send_request(&Request::OpenReminder).await {
                log::warn!("{}", e);
            }
        });
    });

    let on_export_json = {
        let export_busy = export_busy.clone();
        let export_status = export_status.clone();
        Callback::from(move |_| {
            let export_busy = export_busy.clone();
            let export_status = export_status.clone();
            export_busy.set(true);
            spawn_local(async move {
                match bridge::load_entries().await {
                    Ok(entries) if entries.is_empty() => export_status.set(Some(NOTHING_TO_EXPORT.to_string())),
                    Ok(entries) => match to_json(&entries) {
                        Ok(json) => {
                            let filename = export_filename(&bridge::today_key(), "json");
                            bridge::export_to_file(&json, &filename, "application/json");
                            export_status.set(None);
                        }
                        Err(e) => log::warn!("Export failed: {:?}", e),
                    },
                    Err(e) => log::warn!("{}", e),
                }
                export_busy.set(false);
            });
        })
    };

    let on_export_csv = {
        let export_busy = export_busy.clone();
        let export_status = export_status.clone();
        let offset = *offset;
        Callback::from(move |_| {
            let export_busy = export_busy.clone();
            let export_status = export_status.clone();
            export_busy.set(true);
            spawn_local(async move {
                match bridge::load_entries().await {
                    Ok(entries) if entries.is_empty() => export_status.set(Some(NOTHING_TO_EXPORT.to_string())),
                    Ok(entries) => {
                        let filename = export_filename(&bridge::today_key(), "csv");
                        bridge::export_to_file(&to_csv(&entries, offset), &filename, "text/csv");
                        export_status.set(None);
                    }
                    Err(e) => log::warn!("{}", e),
                }
                export_busy.set(false);
            });
        })
    };

    let on_reset = {
        let export_busy = export_busy.clone();
        let entries = entries.clone();
        Callback::from(move |_| {
            if !bridge::confirm_action("reset every saved accomplishment? this cannot be undone.") {
                return;
            }
            let export_busy = export_busy.clone();
            let entries = entries.clone();
            export_busy.set(true);
            spawn_local(async move {
                match bridge::send_request(&Request::ResetEntries).await {
                    Ok(response) if !response.success => {
                        log::warn!("reset failed: {}", response.error.unwrap_or_default());
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("{}", e),
                }
                refresh_entries(entries);
                export_busy.set(false);
            });
        })
    };

    let on_pane_click = {
        let pane = pane.clone();
        move |target: Pane| {
            let pane = pane.clone();
            Callback::from(move |_| pane.set(target))
        }
    };

    let current = *pane;

    html! {
        <div class="layout">
            <header class="header-block">
                <h1 class="header-title">{"🍅 tomatoh"}</h1>
                <p>{"notice and account your tasks"}</p>
                <button
                    type="button"
                    class="light-dark-toggle"
                    onclick={on_toggle_dark}
                    aria-label={if *dark_mode { "switch to light mode" } else { "switch to dark mode" }}
                >
                    {if *dark_mode { "🌙" } else { "☀️" }}
                </button>
            </header>

            <div class="pin-grid">
                {match current {
                    Pane::Log => html! {
                        <EntryList
                            entries={(*entries).clone()}
                            offset={*offset}
                            draft={(*draft).clone()}
                            on_draft_input={on_draft_input}
                            on_save={on_save_entry}
                            saving={*saving_entry}
                            status={(*save_status).clone()}
                        />
                    },
                    Pane::Reminders => html! {
                        <ReminderSettings
                            interval={(*interval).clone()}
                            on_interval_input={on_interval_input}
                            on_save={on_save_interval}
                            on_open_reminder={on_open_reminder}
                            saving={*saving_interval}
                            status={(*interval_status).clone()}
                            next_reminder={(*next_reminder).clone()}
                        />
                    },
                    Pane::Exports => html! {
                        <ExportPanel
                            on_export_json={on_export_json}
                            on_export_csv={on_export_csv}
                            on_reset={on_reset}
                            busy={*export_busy}
                            status={(*export_status).clone()}
                        />
                    },
                }}
            </div>

            <div class="pagination-bar">
                <Button
                    onclick={on_pane_click(current.prev())}
                    disabled={current == Pane::Log}
                    variant={ButtonVariant::Secondary}
                >
                    {"‹"}
                </Button>
                <div class="pf-v5-c-tabs tabs-nav">
                    <ul class="pf-v5-c-tabs__list">
                        {for Pane::ALL.iter().map(|item| html! {
                            <li class={if *item == current { "pf-v5-c-tabs__item pf-m-current" } else { "pf-v5-c-tabs__item" }}>
                                <button class="pf-v5-c-tabs__link" onclick={on_pane_click(*item)}>
                                    <span class="pf-v5-c-tabs__item-text">{item.label()}</span>
                                </button>
                            </li>
                        })}
                    </ul>
                </div>
                <Button
                    onclick={on_pane_click(current.next())}
                    disabled={current == Pane::Exports}
                    variant={ButtonVariant::Secondary}
                >
                    {"›"}
                </Button>
            </div>
        </div>
    }
}

// Helper functions

fn refresh_entries(entries: UseStateHandle<Vec<Entry>>) {
    spawn_local(async move {
        match bridge::load_entries().await {
            Ok(data) => entries.set(data.newest_first(&bridge::today_key())),
            Err(e) => log::warn!("Failed to load entries: {}", e),
        }
    });
}

fn refresh_interval(interval: UseStateHandle<String>) {
    spawn_local(async move {
        match bridge::send_request(&Request::GetInterval).await {
            Ok(response) if response.success => {
                if let Some(minutes) = response.minutes {
                    interval.set(minutes.to_string());
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Failed to load interval: {}", e),
        }
    });
}

fn refresh_countdown(next_reminder: UseStateHandle<String>, offset: FixedOffset) {
    spawn_local(async move {
        match bridge::next_alarm_time(ALARM_NAME).await {
            Ok(scheduled) => next_reminder.set(countdown_label(scheduled, bridge::now_ms(), offset)),
            Err(e) => log::warn!("{}", e),
        }
    });
}

fn refresh_dark_mode(dark_mode: UseStateHandle<bool>) {
    spawn_local(async move {
        if let Some(enabled) = bridge::apply_stored_theme().await {
            dark_mode.set(enabled);
        }
    });
}
