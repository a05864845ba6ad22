/// Popup panes: today's log, reminder settings, exports

use crate::export::clock_time;
use crate::storage::Entry;
use chrono::FixedOffset;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusLineProps {
    #[prop_or_default]
    pub status: Option<String>,
}

#[function_component(StatusLine)]
pub fn status_line(props: &StatusLineProps) -> Html {
    html! {
        <span class="status-text">{props.status.clone().unwrap_or_default()}</span>
    }
}

#[derive(Properties, PartialEq)]
pub struct EntryListProps {
    /// Today's entries, latest first
    pub entries: Vec<Entry>,
    pub offset: FixedOffset,
    pub draft: String,
    pub on_draft_input: Callback<InputEvent>,
    pub on_save: Callback<MouseEvent>,
    pub saving: bool,
    #[prop_or_default]
    pub status: Option<String>,
}

#[function_component(EntryList)]
pub fn entry_list(props: &EntryListProps) -> Html {
    html! {
        <div class="pane">
            <h2 class="pane-title">{"today's wins"}</h2>
            <div class="entries-stack">
                if props.entries.is_empty() {
                    <p class="pin-empty">{"no pins yet, drop your latest win below."}</p>
                } else {
                    {for props.entries.iter().map(|entry| html! {
                        <article key={entry.timestamp.clone()} class="entry-card">
                            <span class="entry-time">{clock_time(&entry.timestamp, props.offset)}</span>
                            <p class="entry-note">{&entry.note}</p>
                        </article>
                    })}
                }
            </div>
            <div class="input-group">
                <textarea
                    rows="3"
                    placeholder="write one lingering win…"
                    value={props.draft.clone()}
                    oninput={props.on_draft_input.clone()}
                    class="note-input"
                />
                <div class="cta-row">
                    <StatusLine status={props.status.clone()} />
                    <Button onclick={props.on_save.clone()} disabled={props.saving} variant={ButtonVariant::Primary}>
                        {if props.saving { "saving…" } else { "save win" }}
                    </Button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ReminderSettingsProps {
    /// Raw text of the interval field
    pub interval: String,
    pub on_interval_input: Callback<InputEvent>,
    pub on_save: Callback<MouseEvent>,
    pub on_open_reminder: Callback<MouseEvent>,
    pub saving: bool,
    #[prop_or_default]
    pub status: Option<String>,
    pub next_reminder: String,
}

#[function_component(ReminderSettings)]
pub fn reminder_settings(props: &ReminderSettingsProps) -> Html {
    html! {
        <div class="pane">
            <h2 class="pane-title">{"⏲️ reminders"}</h2>
            <p class="pane-description">{"choose how often the bell nudges you"}</p>
            <div class="input-group">
                <label for="interval" class="pin-label">{"minutes between nudges"}</label>
                <input
                    id="interval"
                    type="number"
                    min="1"
                    max="1440"
                    value={props.interval.clone()}
                    oninput={props.on_interval_input.clone()}
                    class="interval-input"
                />
                <div class="cta-row">
                    <StatusLine status={props.status.clone()} />
                    <Button onclick={props.on_save.clone()} disabled={props.saving} variant={ButtonVariant::Primary}>
                        {if props.saving { "🧭 saving…" } else { "🧭 save interval" }}
                    </Button>
                </div>
            </div>
            <div class="soft-banner">
                <span class="pin-timestamp">{&props.next_reminder}</span>
                <Button onclick={props.on_open_reminder.clone()} variant={ButtonVariant::Secondary}>
                    {"▶ open reminder now"}
                </Button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ExportPanelProps {
    pub on_export_json: Callback<MouseEvent>,
    pub on_export_csv: Callback<MouseEvent>,
    pub on_reset: Callback<MouseEvent>,
    pub busy: bool,
    #[prop_or_default]
    pub status: Option<String>,
}

#[function_component(ExportPanel)]
pub fn export_panel(props: &ExportPanelProps) -> Html {
    html! {
        <div class="pane">
            <h2 class="pane-title">{"exports + reset"}</h2>
            <p class="pane-description">{"download the day's notes or clear the slate."}</p>
            <div class="flex-column-gap">
                <Button onclick={props.on_export_json.clone()} disabled={props.busy} variant={ButtonVariant::Secondary} block={true}>
                    {"export json"}
                </Button>
                <Button onclick={props.on_export_csv.clone()} disabled={props.busy} variant={ButtonVariant::Secondary} block={true}>
                    {"export csv"}
                </Button>
                <Button onclick={props.on_reset.clone()} disabled={props.busy} variant={ButtonVariant::Danger} block={true}>
                    {"reset entries"}
                </Button>
                <StatusLine status={props.status.clone()} />
            </div>
        </div>
    }
}
