use gloo_file::File as GlooFile;
use shared::models::VideoUploadUrlResponse;
use shared::upload::UploadTask;
use shared::video::{VideoFlow, VideoFlowFailure, VideoStage};
use shared::{CandidateId, CandidateProfile, MatchResult};
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use yew::context::ContextHandle;
use yew::prelude::*;

use crate::api::upload::{UploadBody, UploadEvent, UploadHandle};
use crate::api::{AbortOnDrop, ApiClient};
use crate::components::match_result::MatchResultView;
use crate::components::video_capture::VideoCapture;
use crate::components::utils::{debounce, file_meta, render_error_message, take_selected_file};
use crate::context::{PortalContext, use_portal};
use crate::route::Route;

const VIDEO_ACCEPT: &str = "video/*";

#[derive(Properties, PartialEq)]
pub struct VideoUploadProps {
    pub candidate_id: CandidateId,
    pub photo_url: Option<String>,
    #[prop_or_default]
    pub on_matched: Callback<MatchResult>,
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
}

pub enum Msg {
    FileChosen(GlooFile),
    Start,
    Granted(VideoUploadUrlResponse),
    Upload(Uuid, UploadEvent),
    Matched(MatchResult),
    Failed(VideoFlowFailure),
}

/// Verification video panel: upload grant, PUT with progress, then the
/// face-match call and its verdict.
pub struct VideoUpload {
    api: ApiClient,
    flow: VideoFlow,
    file: Option<GlooFile>,
    upload_handle: Option<UploadHandle>,
    error: Option<String>,
    _abort: AbortOnDrop,
    _context_handle: Option<ContextHandle<PortalContext>>,
}

impl Component for VideoUpload {
    type Message = Msg;
    type Properties = VideoUploadProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (portal, context_handle) = PortalContext::from_scope(ctx);
        let abort = AbortOnDrop::new();
        let props = ctx.props();

        Self {
            api: portal.api().with_abort(&abort),
            flow: VideoFlow::new(props.candidate_id, props.photo_url.clone()),
            file: None,
            upload_handle: None,
            error: None,
            _abort: abort,
            _context_handle: context_handle,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        let retargeted = props.candidate_id != old_props.candidate_id || props.photo_url != old_props.photo_url;
        if retargeted && !self.flow.is_busy() {
            self.flow = VideoFlow::new(props.candidate_id, props.photo_url.clone());
            self.file = None;
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => self.handle_file_chosen(file),
            Msg::Start => self.handle_start(ctx),
            Msg::Granted(grant) => self.handle_granted(ctx, grant),
            Msg::Upload(task_id, event) => self.handle_upload_event(ctx, task_id, event),
            Msg::Matched(result) => {
                log::info!(
                    "Face match for candidate {} finished: {:.2}",
                    self.flow.candidate_id(),
                    result.confidence_score
                );
                self.flow.matched(result.clone());
                ctx.props().on_matched.emit(result);
                true
            }
            Msg::Failed(failure) => {
                log::error!("Video verification failed: {:?}", failure);
                self.flow.fail(failure);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let busy = self.flow.is_busy();
        let onchange = ctx
            .link()
            .batch_callback(|e: Event| take_selected_file(&e).map(Msg::FileChosen));

        html! {
            <div class="video-upload">
                <div class="form-header">
                    <h2><i class="fa-solid fa-video"></i>{" Upload Candidate Verification Video"}</h2>
                    { self.render_close_button(ctx) }
                </div>
                <input type="file" accept={VIDEO_ACCEPT} {onchange} disabled={busy} />
                <VideoCapture on_recorded={ctx.link().callback(Msg::FileChosen)} disabled={busy} />
                { for self.flow.selection().map(|meta| html! {
                    <p class="document-selected">{ format!("Selected: {}", meta.name) }</p>
                }) }
                { render_error_message(self.error.as_ref()) }
                { self.render_stage() }
                <button
                    class="analyze-btn"
                    disabled={busy || self.file.is_none()}
                    onclick={debounce(300, {
                        let link = ctx.link().clone();
                        move || link.send_message(Msg::Start)
                    })}
                >
                    { if busy {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Uploading..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-upload"></i>{" Upload Video"}</> }
                    }}
                </button>
            </div>
        }
    }
}

// Handler methods
impl VideoUpload {
    fn handle_file_chosen(&mut self, file: GlooFile) -> bool {
        if self.flow.is_busy() {
            return false;
        }
        match self.flow.select(file_meta(&file)) {
            Ok(()) => {
                self.file = Some(file);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    fn handle_start(&mut self, ctx: &Context<Self>) -> bool {
        if self.flow.is_busy() {
            return false;
        }
        let request = match self.flow.begin() {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return true;
            }
        };
        self.error = None;

        let link = ctx.link().clone();
        let api = self.api.clone();
        spawn_local(async move {
            match api.video_upload_url(&request).await {
                Ok(grant) => link.send_message(Msg::Granted(grant)),
                Err(e) if e.is_aborted() => {}
                Err(e) => {
                    gloo_console::error!(format!("Upload URL request failed: {}", e));
                    link.send_message(Msg::Failed(VideoFlowFailure::UploadUrl));
                }
            }
        });
        true
    }

    fn handle_granted(&mut self, ctx: &Context<Self>, grant: VideoUploadUrlResponse) -> bool {
        let Some(task_id) = self.flow.url_granted(grant).map(UploadTask::id) else {
            return false;
        };
        let (Some(url), Some(file)) = (self.flow.upload_url().map(String::from), self.file.as_ref()) else {
            self.flow.fail(VideoFlowFailure::StoragePut);
            return true;
        };

        let on_event = ctx.link().callback(move |event| Msg::Upload(task_id, event));
        let body = UploadBody::Raw {
            blob: file.as_ref(),
            content_type: "application/octet-stream",
        };
        match UploadHandle::send("PUT", &url, body, on_event) {
            Ok(handle) => self.upload_handle = Some(handle),
            Err(e) => {
                log::error!("Could not start video PUT: {}", e);
                self.flow.fail(VideoFlowFailure::StoragePut);
            }
        }
        true
    }

    fn handle_upload_event(&mut self, ctx: &Context<Self>, task_id: Uuid, event: UploadEvent) -> bool {
        match event {
            UploadEvent::Progress { loaded, total } => {
                self.flow.progress(task_id, loaded, total);
                true
            }
            UploadEvent::Finished(Ok(_)) => {
                let Some(request) = self.flow.uploaded(task_id) else {
                    return false;
                };
                log::info!("Video stored as {}", request.video_url);

                let link = ctx.link().clone();
                let api = self.api.clone();
                spawn_local(async move {
                    match api.face_match(&request).await {
                        Ok(result) => link.send_message(Msg::Matched(result)),
                        Err(e) if e.is_aborted() => {}
                        Err(e) => {
                            gloo_console::error!(format!("Face match failed: {}", e));
                            link.send_message(Msg::Failed(VideoFlowFailure::Match));
                        }
                    }
                });
                true
            }
            UploadEvent::Finished(Err(e)) if e.is_aborted() => false,
            UploadEvent::Finished(Err(e)) => {
                log::error!("Video PUT failed: {}", e);
                self.flow.fail(VideoFlowFailure::StoragePut);
                true
            }
        }
    }
}

// Rendering methods
impl VideoUpload {
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

    fn render_stage(&self) -> Html {
        match self.flow.stage() {
            VideoStage::Idle => html! {},
            VideoStage::RequestingUrl => html! {
                <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Preparing upload..."}</p>
            },
            VideoStage::Uploading(task) => html! {
                <div class="result-item upload-progress">
                    <div class="result-label">{ task.label() }</div>
                    <div class="result-bar-container">
                        <div class="result-bar" style={format!("width: {}%", task.progress())}></div>
                    </div>
                    <div class="result-value">{ format!("{}%", task.progress()) }</div>
                </div>
            },
            VideoStage::Matching => html! {
                <div class="result-item matching">
                    <div class="result-label"><i class="fa-solid fa-spinner fa-spin"></i>{" Matching…"}</div>
                    <div class="result-bar-container indeterminate">
                        <div class="result-bar"></div>
                    </div>
                </div>
            },
            VideoStage::Matched(result) => html! { <MatchResultView result={result.clone()} /> },
            VideoStage::Failed(failure) => render_error_message(Some(&failure.to_string())),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct VideoUploadPageProps {
    pub candidate_id: CandidateId,
}

/// Standalone route for the video panel. Looks up the candidate photo the
/// video is matched against.
#[function_component(VideoUploadPage)]
pub fn video_upload_page(props: &VideoUploadPageProps) -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());
    let candidate = use_state(|| None::<CandidateProfile>);
    let error = use_state(|| None::<String>);

    {
        let api = portal.api().with_abort(&abort);
        let (candidate, error) = (candidate.clone(), error.clone());
        use_effect_with(props.candidate_id, move |id| {
            let id = *id;
            spawn_local(async move {
                match api.hr_candidate(id).await {
                    Ok(profile) => candidate.set(Some(profile)),
                    Err(e) if e.is_aborted() => {}
                    Err(e) => error.set(Some(e.user_message("Failed to load candidate details."))),
                }
            });
            || ()
        });
    }

    let on_close = {
        let portal = portal.clone();
        let id = props.candidate_id;
        Callback::from(move |_| portal.navigate(Route::HrCandidate(id)))
    };

    html! {
        <div class="panel-page">
            { render_error_message((*error).as_ref()) }
            { match &*candidate {
                Some(profile) => html! {
                    <VideoUpload
                        candidate_id={props.candidate_id}
                        photo_url={profile.photo.clone()}
                        on_close={Some(on_close)}
                    />
                },
                None => html! { <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Loading..."}</p> },
            }}
        </div>
    }
}
