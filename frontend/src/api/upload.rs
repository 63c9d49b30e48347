//! Uploads that report byte progress. `fetch` has no upload progress, so
//! these go through `XMLHttpRequest`.

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Blob, FormData, ProgressEvent, XmlHttpRequest};
use yew::Callback;

use super::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Progress { loaded: f64, total: f64 },
    Finished(Result<String, ApiError>),
}

pub enum UploadBody<'a> {
    Multipart(&'a FormData),
    Raw {
        blob: &'a Blob,
        content_type: &'a str,
    },
}

/// In-flight upload. Dropping it aborts the request and silences its
/// callbacks.
pub struct UploadHandle {
    xhr: XmlHttpRequest,
    listeners: Vec<EventListener>,
}

fn js_error(err: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Network(format!("{:?}", err))
}

impl UploadHandle {
    pub fn send(
        method: &str,
        url: &str,
        body: UploadBody<'_>,
        on_event: Callback<UploadEvent>,
    ) -> Result<Self, ApiError> {
        let xhr = XmlHttpRequest::new().map_err(js_error)?;
        xhr.open_with_async(method, url, true).map_err(js_error)?;

        let target = xhr.upload().map_err(js_error)?;
        let progress = {
            let on_event = on_event.clone();
            EventListener::new(&target, "progress", move |event| {
                if let Some(progress) = event.dyn_ref::<ProgressEvent>() {
                    let total = if progress.length_computable() {
                        progress.total()
                    } else {
                        0.0
                    };
                    on_event.emit(UploadEvent::Progress {
                        loaded: progress.loaded(),
                        total,
                    });
                }
            })
        };

        let load = {
            let on_event = on_event.clone();
            let request = xhr.clone();
            EventListener::new(&xhr, "load", move |_| {
                let status = request.status().unwrap_or(0);
                let body = request.response_text().ok().flatten().unwrap_or_default();
                let outcome = if (200..300).contains(&status) {
                    Ok(body)
                } else {
                    Err(ApiError::Server { status, body })
                };
                on_event.emit(UploadEvent::Finished(outcome));
            })
        };

        let error = {
            let on_event = on_event.clone();
            EventListener::new(&xhr, "error", move |_| {
                on_event.emit(UploadEvent::Finished(Err(ApiError::Network(
                    "upload connection failed".to_string(),
                ))));
            })
        };

        let abort = EventListener::new(&xhr, "abort", move |_| {
            on_event.emit(UploadEvent::Finished(Err(ApiError::Aborted)));
        });

        match body {
            UploadBody::Multipart(form) => xhr.send_with_opt_form_data(Some(form)),
            UploadBody::Raw { blob, content_type } => {
                xhr.set_request_header("Content-Type", content_type)
                    .map_err(js_error)?;
                xhr.send_with_opt_blob(Some(blob))
            }
        }
        .map_err(js_error)?;

        log::info!("{} {} started", method, url.split('?').next().unwrap_or(url));

        Ok(Self {
            xhr,
            listeners: vec![progress, load, error, abort],
        })
    }
}

impl Drop for UploadHandle {
    fn drop(&mut self) {
        // Listeners go first so the abort is not reported to a component
        // that no longer exists.
        self.listeners.clear();
        if self.xhr.ready_state() != XmlHttpRequest::DONE {
            let _ = self.xhr.abort();
        }
    }
}
