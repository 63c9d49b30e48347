//! Verification video flow: pick, get an upload grant, PUT, then ask the
//! backend to match the video against the candidate photo.

use thiserror::Error;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::files::{check_video, FileMeta};
use crate::models::{
    CandidateId, FaceMatchRequest, MatchResult, VideoUploadUrlRequest, VideoUploadUrlResponse,
};
use crate::upload::UploadTask;

pub const VIDEO_PREFIX: &str = "video/";

/// Container used when the recorder does not report one.
pub const DEFAULT_RECORDING_MIME: &str = "video/webm";

/// Bare MIME type of a webcam recording: codec parameters dropped so the
/// type matches the upload whitelist.
pub fn recording_mime(reported: &str) -> String {
    let bare = reported.split(';').next().unwrap_or_default().trim();
    if bare.is_empty() {
        DEFAULT_RECORDING_MIME.to_string()
    } else {
        bare.to_ascii_lowercase()
    }
}

pub fn recording_file_name(mime: &str) -> String {
    let ext = match mime {
        "video/mp4" => "mp4",
        "video/quicktime" | "video/mov" => "mov",
        "video/x-matroska" | "video/mkv" => "mkv",
        _ => "webm",
    };
    format!("recorded-video.{}", ext)
}

/// One video per candidate; a new upload overwrites the previous object.
pub fn video_filename(candidate_id: CandidateId) -> String {
    format!("candidate_{}.mp4", candidate_id)
}

pub fn video_object_key(candidate_id: CandidateId) -> String {
    format!("{}{}", VIDEO_PREFIX, video_filename(candidate_id))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoFlowFailure {
    #[error("Could not get an upload link for the video. Please try again.")]
    UploadUrl,
    #[error("Failed to upload video. Please try again.")]
    StoragePut,
    #[error("Facial recognition process failed.")]
    Match,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VideoStage {
    Idle,
    RequestingUrl,
    Uploading(UploadTask),
    Matching,
    Matched(MatchResult),
    Failed(VideoFlowFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoFlow {
    candidate_id: CandidateId,
    photo_url: Option<String>,
    selection: Option<FileMeta>,
    grant: Option<VideoUploadUrlResponse>,
    stage: VideoStage,
}

impl VideoFlow {
    pub fn new(candidate_id: CandidateId, photo_url: Option<String>) -> Self {
        Self {
            candidate_id,
            photo_url,
            selection: None,
            grant: None,
            stage: VideoStage::Idle,
        }
    }

    pub fn candidate_id(&self) -> CandidateId {
        self.candidate_id
    }

    pub fn stage(&self) -> &VideoStage {
        &self.stage
    }

    pub fn selection(&self) -> Option<&FileMeta> {
        self.selection.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.stage,
            VideoStage::RequestingUrl | VideoStage::Uploading(_) | VideoStage::Matching
        )
    }

    /// Validates and remembers a picked video. A rejected file keeps the
    /// previous selection. A new pick clears a finished or failed attempt.
    pub fn select(&mut self, meta: FileMeta) -> Result<(), ValidationError> {
        check_video(&meta)?;
        self.selection = Some(meta);
        if !self.is_busy() {
            self.grant = None;
            self.stage = VideoStage::Idle;
        }
        Ok(())
    }

    pub fn begin(&mut self) -> Result<VideoUploadUrlRequest, ValidationError> {
        let meta = self.selection.as_ref().ok_or(ValidationError::NoVideoSelected)?;
        let request = VideoUploadUrlRequest {
            candidate_id: self.candidate_id,
            content_type: meta.mime.clone(),
        };
        self.grant = None;
        self.stage = VideoStage::RequestingUrl;
        Ok(request)
    }

    /// Stores the grant and opens an upload task for the PUT.
    pub fn url_granted(&mut self, grant: VideoUploadUrlResponse) -> Option<&UploadTask> {
        if self.stage != VideoStage::RequestingUrl {
            return None;
        }
        self.grant = Some(grant);
        self.stage = VideoStage::Uploading(UploadTask::start(self.selection.clone()));
        match &self.stage {
            VideoStage::Uploading(task) => Some(task),
            _ => None,
        }
    }

    pub fn upload_url(&self) -> Option<&str> {
        self.grant.as_ref().map(|g| g.upload_url.as_str())
    }

    pub fn progress(&mut self, task_id: Uuid, loaded: f64, total: f64) {
        if let VideoStage::Uploading(task) = &mut self.stage {
            if task.id() == task_id {
                task.record_progress(loaded, total);
            }
        }
    }

    /// The PUT finished; returns the match request to send next.
    pub fn uploaded(&mut self, task_id: Uuid) -> Option<FaceMatchRequest> {
        match &mut self.stage {
            VideoStage::Uploading(task) if task.id() == task_id => task.succeed(),
            _ => return None,
        }
        let grant = self.grant.as_ref()?;
        let request = FaceMatchRequest {
            candidate_id: self.candidate_id,
            video_filename: video_filename(self.candidate_id),
            video_url: grant.object_url.clone(),
            photo_url: self.photo_url.clone(),
        };
        self.stage = VideoStage::Matching;
        Some(request)
    }

    pub fn matched(&mut self, result: MatchResult) {
        if self.stage == VideoStage::Matching {
            self.stage = VideoStage::Matched(result);
        }
    }

    /// Aborts the flow at its current step. Nothing is retried or rolled
    /// back; the partially written object stays in storage.
    pub fn fail(&mut self, failure: VideoFlowFailure) {
        if let VideoStage::Uploading(task) = &mut self.stage {
            task.fail(failure.to_string());
        }
        self.stage = VideoStage::Failed(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::{format_percent, ConfidenceTier};

    fn grant() -> VideoUploadUrlResponse {
        VideoUploadUrlResponse {
            object_key: "video/candidate_12.mp4".into(),
            upload_url: "https://os.example.com/bucket/video/candidate_12.mp4?X-Amz-Signature=abc".into(),
            object_url: "https://os.example.com/bucket/video/candidate_12.mp4".into(),
            expires_in_secs: 900,
        }
    }

    fn ready_flow() -> VideoFlow {
        let mut flow = VideoFlow::new(CandidateId(12), Some("https://os/photo.png".into()));
        flow.select(FileMeta::new("clip.mp4", "video/mp4", 10 * 1024 * 1024))
            .unwrap();
        flow
    }

    #[test]
    fn object_key_is_deterministic_per_candidate() {
        assert_eq!(video_object_key(CandidateId(12)), "video/candidate_12.mp4");
        assert_eq!(video_object_key(CandidateId(12)), video_object_key(CandidateId(12)));
    }

    #[test]
    fn begin_requires_a_selection() {
        let mut flow = VideoFlow::new(CandidateId(1), None);
        assert_eq!(flow.begin(), Err(ValidationError::NoVideoSelected));
        assert_eq!(flow.stage(), &VideoStage::Idle);
    }

    #[test]
    fn rejected_video_keeps_previous_selection() {
        let mut flow = ready_flow();
        let err = flow.select(FileMeta::new("x.gif", "image/gif", 10)).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedVideoType);
        assert_eq!(flow.selection().unwrap().name, "clip.mp4");
    }

    #[test]
    fn successful_put_then_match_renders_pass() {
        let mut flow = ready_flow();
        let req = flow.begin().unwrap();
        assert_eq!(req.content_type, "video/mp4");

        let task_id = flow.url_granted(grant()).unwrap().id();
        flow.progress(task_id, 5.0, 10.0);
        let match_req = flow.uploaded(task_id).unwrap();

        assert_eq!(match_req.video_filename, "candidate_12.mp4");
        assert_eq!(match_req.photo_url.as_deref(), Some("https://os/photo.png"));
        assert_eq!(flow.stage(), &VideoStage::Matching);
        assert!(flow.is_busy());

        flow.matched(MatchResult {
            confidence_score: 0.83,
            match_found: true,
            ..Default::default()
        });

        match flow.stage() {
            VideoStage::Matched(result) => {
                assert_eq!(ConfidenceTier::from_score(result.confidence_score), ConfidenceTier::Pass);
                assert_eq!(format_percent(result.confidence_score), "83%");
            }
            other => panic!("unexpected stage {:?}", other),
        }
    }

    #[test]
    fn new_pick_after_failure_starts_over() {
        let mut flow = ready_flow();
        flow.begin().unwrap();
        flow.fail(VideoFlowFailure::UploadUrl);

        flow.select(FileMeta::new("take2.webm", "video/webm", 2048)).unwrap();

        assert_eq!(flow.stage(), &VideoStage::Idle);
        assert_eq!(flow.upload_url(), None);
        assert_eq!(flow.selection().unwrap().name, "take2.webm");
    }

    #[test]
    fn new_pick_after_verdict_clears_it() {
        let mut flow = ready_flow();
        flow.begin().unwrap();
        let task_id = flow.url_granted(grant()).unwrap().id();
        flow.uploaded(task_id).unwrap();
        flow.matched(MatchResult::default());

        flow.select(FileMeta::new("again.mp4", "video/mp4", 2048)).unwrap();
        assert_eq!(flow.stage(), &VideoStage::Idle);
    }

    #[test]
    fn pick_during_upload_keeps_the_running_stage() {
        let mut flow = ready_flow();
        flow.begin().unwrap();
        flow.url_granted(grant()).unwrap();

        flow.select(FileMeta::new("later.mp4", "video/mp4", 2048)).unwrap();
        assert!(matches!(flow.stage(), VideoStage::Uploading(_)));
    }

    #[test]
    fn recordings_get_a_whitelisted_type_and_name() {
        let mime = recording_mime("video/webm;codecs=vp8,opus");
        assert_eq!(mime, "video/webm");
        assert!(check_video(&FileMeta::new(recording_file_name(&mime), mime.clone(), 1024)).is_ok());
        assert_eq!(recording_file_name(&mime), "recorded-video.webm");

        assert_eq!(recording_mime(""), DEFAULT_RECORDING_MIME);
        assert_eq!(recording_file_name(&recording_mime("video/mp4")), "recorded-video.mp4");
    }

    #[test]
    fn stale_upload_events_are_ignored() {
        let mut flow = ready_flow();
        flow.begin().unwrap();
        flow.url_granted(grant()).unwrap();

        assert_eq!(flow.uploaded(Uuid::new_v4()), None);
        assert!(matches!(flow.stage(), VideoStage::Uploading(_)));
    }

    #[test]
    fn put_failure_aborts_before_matching() {
        let mut flow = ready_flow();
        flow.begin().unwrap();
        flow.url_granted(grant()).unwrap();

        flow.fail(VideoFlowFailure::StoragePut);

        assert_eq!(flow.stage(), &VideoStage::Failed(VideoFlowFailure::StoragePut));
        assert!(!flow.is_busy());
        flow.matched(MatchResult::default());
        assert_eq!(flow.stage(), &VideoStage::Failed(VideoFlowFailure::StoragePut));
    }

    #[test]
    fn failures_have_distinct_messages() {
        let a = VideoFlowFailure::StoragePut.to_string();
        let b = VideoFlowFailure::Match.to_string();
        let c = VideoFlowFailure::UploadUrl.to_string();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }
}
