use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use gloo_file::{Blob, File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::files::FileMeta;
use shared::meetings::LocalZone;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlAnchorElement, HtmlInputElement};
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

pub fn render_error_message(error: Option<&String>) -> Html {
    if let Some(error_msg) = error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}

pub fn render_success_message(message: Option<&String>) -> Html {
    match message {
        Some(text) => html! {
            <div class="success-message">
                <i class="fa-solid fa-circle-check"></i>
                <p>{ text }</p>
            </div>
        },
        None => html! {},
    }
}

pub fn file_meta(file: &GlooFile) -> FileMeta {
    FileMeta::new(file.name(), file.raw_mime_type(), file.size())
}

/// First file of a file input change event. The input is cleared so the
/// same file can be picked again after a rejection.
pub fn take_selected_file(e: &Event) -> Option<GlooFile> {
    let input: HtmlInputElement = e.target_unchecked_into();
    let file = input
        .files()
        .and_then(|list| list.item(0))
        .map(GlooFile::from);
    input.set_value("");
    file
}

pub fn input_value(e: &InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

/// The browser's own time zone. Offsets come from a `Date` at the instant in
/// question, so they follow daylight saving.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserZone;

impl LocalZone for BrowserZone {
    fn offset_at_utc(&self, instant: DateTime<Utc>) -> i32 {
        let millis = JsValue::from_f64(instant.timestamp_millis() as f64);
        js_sys::Date::new(&millis).get_timezone_offset() as i32
    }

    fn offset_at_local(&self, local: NaiveDateTime) -> i32 {
        js_sys::Date::new_with_year_month_day_hr_min(
            local.year() as u32,
            local.month0() as i32,
            local.day() as i32,
            local.hour() as i32,
            local.minute() as i32,
        )
        .get_timezone_offset() as i32
    }
}

/// Saves `content` as a file through a temporary object URL.
pub fn trigger_download(content: &str, mime: &str, file_name: &str) -> Result<(), String> {
    let blob = Blob::new_with_options(content, Some(mime));
    let url = ObjectUrl::from(blob);

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document available")?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("{:?}", e))?
        .dyn_into()
        .map_err(|_| "created element is not an anchor".to_string())?;

    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    Ok(())
}
