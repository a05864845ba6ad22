/// Reminder prompt shown in the fixed-size popup window

use crate::router::Request;
use crate::ui::bridge;
use crate::ui::components::StatusLine;
use patternfly_yew::prelude::*;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[function_component(ReminderApp)]
pub fn reminder_app() -> Html {
    let note = use_state(String::new);
    let status = use_state(|| None::<String>);
    let saving = use_state(|| false);

    // Match the popup's theme
    use_effect_with((), move |_| {
        spawn_local(async move {
            bridge::apply_stored_theme().await;
        });
        || ()
    });

    let on_note_input = {
        let note = note.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlTextAreaElement>() {
                note.set(input.value());
            }
        })
    };

    let on_submit = {
        let note = note.clone();
        let status = status.clone();
        let saving = saving.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let text = note.trim().to_string();
            if text.is_empty() {
                status.set(Some("add one lowercase highlight first".to_string()));
                return;
            }

            let note = note.clone();
            let status = status.clone();
            let saving = saving.clone();

            saving.set(true);
            status.set(Some("saving…".to_string()));

            spawn_local(async move {
                let request = Request::SaveAccomplishment {
                    items: vec![Value::from(text)],
                };
                match bridge::send_request(&request).await {
                    Ok(response) if response.success => {
                        status.set(Some("logged ✨".to_string()));
                        note.set(String::new());
                    }
                    Ok(response) => {
                        status.set(Some(response.error.unwrap_or_else(|| "could not save yet".to_string())));
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                        status.set(Some("could not save yet".to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let on_skip = Callback::from(|_| bridge::close_window());

    html! {
        <div class="reminder-shell">
            <form class="reminder-card" onsubmit={on_submit}>
                <h1>{"✨ what did you just accomplish?"}</h1>
                <div class="textarea-stack">
                    <textarea
                        rows="3"
                        placeholder="write something…✍️"
                        value={(*note).clone()}
                        oninput={on_note_input}
                        class="note-input"
                    />
                </div>
                <StatusLine status={(*status).clone()} />
                <div class="reminder-actions">
                    <Button onclick={on_skip} disabled={*saving} variant={ButtonVariant::Secondary}>
                        {"maybe later"}
                    </Button>
                    <button type="submit" class="pf-v5-c-button pf-m-primary" disabled={*saving}>
                        {if *saving { "📝 logging…" } else { "log it 📝" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
