use gloo_file::File as GlooFile;
use js_sys::Array;
use shared::CandidateProfile;
use shared::files::DocumentKind;
use shared::profile::{DocumentForm, DocumentSlot, ProfileSubmission, TextField};
use shared::upload::{UploadState, UploadTask};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{BlobPropertyBag, FormData};
use yew::context::ContextHandle;
use yew::prelude::*;

use crate::api::upload::{UploadBody, UploadEvent, UploadHandle};
use crate::api::{AbortOnDrop, ApiClient};
use crate::components::documents::render_document_link;
use crate::components::utils::{debounce, file_meta, input_value, render_error_message, take_selected_file};
use crate::context::PortalContext;
use crate::route::Route;

const DOCUMENT_SLOTS: [DocumentKind; 3] = [DocumentKind::Photo, DocumentKind::IdProof, DocumentKind::Resume];

#[derive(Properties, PartialEq)]
pub struct CandidateDetailsProps {
    #[prop_or_default]
    pub on_saved: Callback<()>,
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
}

pub enum Msg {
    Loaded(CandidateProfile),
    SetField(TextField, String),
    SetConsent(bool),
    FileChosen(DocumentKind, GlooFile),
    Submit,
    Upload(UploadEvent),
    SetError(Option<String>),
}

/// Candidate document form: edits the profile and sends changed fields and
/// newly picked files as one multipart update.
pub struct CandidateDetails {
    portal: PortalContext,
    api: ApiClient,
    form: Option<DocumentForm<GlooFile>>,
    upload: Option<UploadTask>,
    upload_handle: Option<UploadHandle>,
    error: Option<String>,
    loading: bool,
    _abort: AbortOnDrop,
    _context_handle: Option<ContextHandle<PortalContext>>,
}

fn js_text(err: JsValue) -> String {
    format!("{:?}", err)
}

fn build_form_data(submission: &ProfileSubmission<GlooFile>) -> Result<FormData, String> {
    let form = FormData::new().map_err(js_text)?;

    let json = serde_json::to_string(&submission.update_data).map_err(|e| e.to_string())?;
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let update_data = web_sys::Blob::new_with_str_sequence_and_options(
        &Array::of1(&JsValue::from_str(&json)),
        &options,
    )
    .map_err(js_text)?;
    form.append_with_blob("update_data", &update_data)
        .map_err(js_text)?;

    for (kind, file) in &submission.files {
        form.append_with_blob_and_filename(kind.field_name(), file.as_ref(), &file.name())
            .map_err(js_text)?;
    }
    Ok(form)
}

impl Component for CandidateDetails {
    type Message = Msg;
    type Properties = CandidateDetailsProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (portal, context_handle) = PortalContext::from_scope(ctx);
        let abort = AbortOnDrop::new();
        let api = portal.api().with_abort(&abort);

        let mut model = Self {
            portal,
            api,
            form: None,
            upload: None,
            upload_handle: None,
            error: None,
            loading: true,
            _abort: abort,
            _context_handle: context_handle,
        };

        match model.portal.session.candidate_email() {
            Some(email) => {
                model.form = Some(DocumentForm::new(email.clone()));
                model.fetch_profile(ctx, email);
            }
            None => {
                log::warn!("No candidate session, redirecting to login");
                model.portal.navigate(Route::CandidateLogin);
            }
        }
        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(profile) => {
                if let Some(form) = self.form.as_mut() {
                    form.load(&profile);
                }
                self.loading = false;
                true
            }
            Msg::SetField(field, value) => {
                if let Some(form) = self.form.as_mut() {
                    form.set_field(field, value);
                }
                true
            }
            Msg::SetConsent(consent) => {
                if let Some(form) = self.form.as_mut() {
                    form.set_consent(consent);
                }
                true
            }
            Msg::FileChosen(kind, file) => self.handle_file_chosen(kind, file),
            Msg::Submit => self.handle_submit(ctx),
            Msg::Upload(event) => self.handle_upload_event(ctx, event),
            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(form) = self.form.as_ref() else {
            return html! {};
        };

        html! {
            <div class="details-form">
                <div class="form-header">
                    <h2><i class="fa-solid fa-user-pen"></i>{" Your Details"}</h2>
                    { self.render_close_button(ctx) }
                </div>
                { if self.loading {
                    html! { <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Loading profile..."}</p> }
                } else {
                    html! {}
                }}
                <p class="form-email"><strong>{"Email: "}</strong>{ form.email() }</p>
                { for TextField::ALL.iter().map(|field| self.render_text_field(ctx, form, *field)) }
                { for DOCUMENT_SLOTS.iter().map(|kind| self.render_document_slot(ctx, form, *kind)) }
                <label class="consent">
                    <input
                        type="checkbox"
                        checked={form.consent()}
                        onchange={ctx.link().callback(|e: Event| {
                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                            Msg::SetConsent(input.checked())
                        })}
                    />
                    {" I confirm the information above is accurate and consent to its verification."}
                </label>
                { render_error_message(self.error.as_ref()) }
                { self.render_progress() }
                <button
                    class="analyze-btn"
                    disabled={self.is_uploading()}
                    onclick={debounce(300, {
                        let link = ctx.link().clone();
                        move || link.send_message(Msg::Submit)
                    })}
                >
                    { if self.is_uploading() {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Saving..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-floppy-disk"></i>{" Save Details"}</> }
                    }}
                </button>
            </div>
        }
    }
}

// Handler methods
impl CandidateDetails {
    fn fetch_profile(&self, ctx: &Context<Self>, email: String) {
        let link = ctx.link().clone();
        let api = self.api.clone();
        spawn_local(async move {
            match api.candidate_profile(&email, false).await {
                Ok(profile) => link.send_message(Msg::Loaded(profile)),
                Err(e) if e.is_aborted() => {}
                Err(e) => {
                    log::error!("Profile fetch failed: {}", e);
                    link.send_message(Msg::SetError(Some(
                        e.user_message("Failed to load candidate details."),
                    )))
                }
            }
        });
    }

    fn is_uploading(&self) -> bool {
        self.upload.as_ref().is_some_and(|task| !task.is_settled())
    }

    fn handle_file_chosen(&mut self, kind: DocumentKind, file: GlooFile) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };
        let meta = file_meta(&file);
        match form.select_file(kind, file, meta) {
            Ok(()) => self.error = None,
            Err(e) => {
                log::warn!("Rejected {} file: {}", kind.field_name(), e);
                self.error = Some(e.to_string());
            }
        }
        true
    }

    fn handle_submit(&mut self, ctx: &Context<Self>) -> bool {
        if self.is_uploading() {
            return false;
        }
        let Some(form) = self.form.as_ref() else {
            return false;
        };

        let submission = match form.prepare_submission() {
            Ok(submission) => submission,
            Err(e) => {
                self.error = Some(e.to_string());
                return true;
            }
        };

        let form_data = match build_form_data(&submission) {
            Ok(form_data) => form_data,
            Err(e) => {
                self.error = Some(format!("Failed to prepare upload: {}", e));
                return true;
            }
        };

        let on_event = ctx.link().callback(Msg::Upload);
        match UploadHandle::send(
            "POST",
            &self.api.profile_update_url(),
            UploadBody::Multipart(&form_data),
            on_event,
        ) {
            Ok(handle) => {
                self.error = None;
                self.upload = Some(UploadTask::start(None));
                // Replacing the previous, already settled handle.
                self.upload_handle = Some(handle);
            }
            Err(e) => self.error = Some(e.user_message("Failed to update details. Please try again.")),
        }
        true
    }

    fn handle_upload_event(&mut self, ctx: &Context<Self>, event: UploadEvent) -> bool {
        let Some(task) = self.upload.as_mut() else {
            return false;
        };

        match event {
            UploadEvent::Progress { loaded, total } => {
                let before = task.progress();
                task.record_progress(loaded, total) != before
            }
            UploadEvent::Finished(Ok(_)) => {
                task.succeed();
                let accepted = match self.form.as_mut() {
                    Some(form) => form.accept_update(&*self.portal.session),
                    None => self.portal.session.mark_profile_complete(),
                };
                if let Err(e) = accepted {
                    log::warn!("Could not record profile completion: {}", e);
                }
                log::info!("Profile updated");
                ctx.props().on_saved.emit(());
                if let Some(on_close) = &ctx.props().on_close {
                    on_close.emit(());
                }
                true
            }
            UploadEvent::Finished(Err(e)) if e.is_aborted() => false,
            UploadEvent::Finished(Err(e)) => {
                log::error!("Profile update failed: {}", e);
                task.fail(e.to_string());
                self.error = Some(e.user_message("Failed to update details. Please try again."));
                true
            }
        }
    }
}

// Rendering methods
impl CandidateDetails {
    fn render_close_button(&self, ctx: &Context<Self>) -> Html {
        match &ctx.props().on_close {
            Some(on_close) => {
                let on_close = on_close.clone();
                html! {
                    <button class="remove-btn" title="Close" onclick={Callback::from(move |_| on_close.emit(()))}>
                        <i class="fa-solid fa-times"></i>
                    </button>
                }
            }
            None => html! {},
        }
    }

    fn render_text_field(&self, ctx: &Context<Self>, form: &DocumentForm<GlooFile>, field: TextField) -> Html {
        html! {
            <input
                type="text"
                class="form-input"
                placeholder={field.placeholder()}
                value={form.field(field).to_string()}
                oninput={ctx.link().callback(move |e: InputEvent| Msg::SetField(field, input_value(&e)))}
            />
        }
    }

    fn render_document_slot(&self, ctx: &Context<Self>, form: &DocumentForm<GlooFile>, kind: DocumentKind) -> Html {
        let current = match form.slot(kind) {
            DocumentSlot::Empty => html! { <span class="document-missing">{"No file uploaded"}</span> },
            DocumentSlot::Stored(url) => render_document_link(kind.label(), Some(url.as_str())),
            DocumentSlot::Chosen { meta, .. } => html! {
                <span class="document-selected">{ format!("Selected: {}", meta.name) }</span>
            },
        };

        let onchange = ctx.link().batch_callback(move |e: Event| {
            take_selected_file(&e).map(|file| Msg::FileChosen(kind, file))
        });

        html! {
            <div class="document-slot">
                <label>{ kind.label() }</label>
                <input type="file" accept={kind.accept()} {onchange} />
                { current }
            </div>
        }
    }

    fn render_progress(&self) -> Html {
        let Some(task) = self.upload.as_ref() else {
            return html! {};
        };
        let status = match task.state() {
            UploadState::InFlight => format!("Uploading... {}%", task.progress()),
            UploadState::Succeeded => "Details updated successfully.".to_string(),
            UploadState::Failed(_) => "Upload failed.".to_string(),
        };

        html! {
            <div class="result-item upload-progress">
                <div class="result-label">{ status }</div>
                <div class="result-bar-container">
                    <div class="result-bar" style={format!("width: {}%", task.progress())}></div>
                </div>
                <div class="result-value">{ format!("{}%", task.progress()) }</div>
            </div>
        }
    }
}
