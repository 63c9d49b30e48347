//! Records a verification video from the webcam. The finished recording is
//! handed over as a file, the same way a picked file is.

use gloo_events::EventListener;
use gloo_file::File as GlooFile;
use shared::video::{recording_file_name, recording_mime};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    BlobEvent, FilePropertyBag, HtmlVideoElement, MediaRecorder, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use yew::prelude::*;

use crate::components::utils::render_error_message;

const CAMERA_UNAVAILABLE: &str = "Camera access was denied or is unavailable.";

#[derive(Properties, PartialEq)]
pub struct VideoCaptureProps {
    pub on_recorded: Callback<GlooFile>,
    #[prop_or_default]
    pub disabled: bool,
}

pub enum Msg {
    Start,
    Ready(MediaStream),
    Unavailable(String),
    Stop,
    Stopped,
}

pub struct VideoCapture {
    video_ref: NodeRef,
    stream: Option<MediaStream>,
    recorder: Option<MediaRecorder>,
    chunks: js_sys::Array,
    listeners: Vec<EventListener>,
    requesting: bool,
    error: Option<String>,
}

fn js_text(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

async fn open_camera() -> Result<MediaStream, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let devices = window.navigator().media_devices()?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    let stream = JsFuture::from(devices.get_user_media_with_constraints(&constraints)?).await?;
    stream.dyn_into::<MediaStream>()
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

impl Component for VideoCapture {
    type Message = Msg;
    type Properties = VideoCaptureProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            video_ref: NodeRef::default(),
            stream: None,
            recorder: None,
            chunks: js_sys::Array::new(),
            listeners: Vec::new(),
            requesting: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Start => self.handle_start(ctx),
            Msg::Ready(stream) => self.handle_ready(ctx, stream),
            Msg::Unavailable(reason) => {
                log::warn!("Camera unavailable: {}", reason);
                self.requesting = false;
                self.release();
                self.error = Some(CAMERA_UNAVAILABLE.to_string());
                true
            }
            Msg::Stop => {
                if let Some(recorder) = &self.recorder {
                    if let Err(e) = recorder.stop() {
                        log::error!("Recorder did not stop: {}", js_text(&e));
                        self.release();
                    }
                }
                true
            }
            Msg::Stopped => self.handle_stopped(ctx),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let recording = self.recorder.is_some();
        let link = ctx.link();

        html! {
            <div class="video-capture">
                <video
                    ref={self.video_ref.clone()}
                    class="capture-preview"
                    autoplay={true}
                    muted={true}
                    hidden={!recording}
                />
                { render_error_message(self.error.as_ref()) }
                { if recording {
                    html! {
                        <button class="analyze-btn" style="background-color: var(--danger-color);" onclick={link.callback(|_| Msg::Stop)}>
                            <i class="fa-solid fa-stop"></i>{" Stop Recording"}
                        </button>
                    }
                } else {
                    html! {
                        <button
                            class="analyze-btn"
                            disabled={ctx.props().disabled || self.requesting}
                            onclick={link.callback(|_| Msg::Start)}
                        >
                            <i class="fa-solid fa-camera"></i>{" Record Video"}
                        </button>
                    }
                }}
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.release();
    }
}

// Handler methods
impl VideoCapture {
    fn handle_start(&mut self, ctx: &Context<Self>) -> bool {
        if self.requesting || self.recorder.is_some() {
            return false;
        }
        self.requesting = true;
        self.error = None;

        let link = ctx.link().clone();
        spawn_local(async move {
            match open_camera().await {
                Ok(stream) => link.send_message(Msg::Ready(stream)),
                Err(e) => link.send_message(Msg::Unavailable(js_text(&e))),
            }
        });
        true
    }

    fn handle_ready(&mut self, ctx: &Context<Self>, stream: MediaStream) -> bool {
        self.requesting = false;
        let recorder = match MediaRecorder::new_with_media_stream(&stream) {
            Ok(recorder) => recorder,
            Err(e) => {
                stop_tracks(&stream);
                ctx.link().send_message(Msg::Unavailable(js_text(&e)));
                return false;
            }
        };
        if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
            video.set_src_object(Some(&stream));
        }

        self.chunks = js_sys::Array::new();
        let data = {
            let chunks = self.chunks.clone();
            EventListener::new(&recorder, "dataavailable", move |event| {
                if let Some(blob) = event.dyn_ref::<BlobEvent>().and_then(BlobEvent::data) {
                    if blob.size() > 0.0 {
                        chunks.push(&blob);
                    }
                }
            })
        };
        let stopped = {
            let link = ctx.link().clone();
            EventListener::new(&recorder, "stop", move |_| link.send_message(Msg::Stopped))
        };

        if let Err(e) = recorder.start() {
            stop_tracks(&stream);
            ctx.link().send_message(Msg::Unavailable(js_text(&e)));
            return false;
        }
        log::info!("Recording started");

        self.listeners = vec![data, stopped];
        self.recorder = Some(recorder);
        self.stream = Some(stream);
        true
    }

    fn handle_stopped(&mut self, ctx: &Context<Self>) -> bool {
        let mime = self
            .recorder
            .as_ref()
            .map(|r| recording_mime(&r.mime_type()))
            .unwrap_or_else(|| recording_mime(""));
        let chunks = std::mem::replace(&mut self.chunks, js_sys::Array::new());
        self.release();

        if chunks.length() == 0 {
            self.error = Some("Nothing was recorded. Please try again.".to_string());
            return true;
        }

        let options = FilePropertyBag::new();
        options.set_type(&mime);
        match web_sys::File::new_with_blob_sequence_and_options(&chunks, &recording_file_name(&mime), &options) {
            Ok(file) => {
                let file = GlooFile::from(file);
                log::info!("Recorded {} ({} bytes)", file.name(), file.size());
                ctx.props().on_recorded.emit(file);
            }
            Err(e) => {
                log::error!("Could not assemble recording: {}", js_text(&e));
                self.error = Some("Could not save the recording.".to_string());
            }
        }
        true
    }

    /// Turns the camera off and forgets the recorder.
    fn release(&mut self) {
        self.listeners.clear();
        self.recorder = None;
        if let Some(stream) = self.stream.take() {
            stop_tracks(&stream);
        }
        if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
            video.set_src_object(None);
        }
    }
}
