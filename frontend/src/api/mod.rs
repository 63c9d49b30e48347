pub mod upload;

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::auth::find_detail;
use shared::models::{
    CandidateLoginResponse, CandidateMatchStatus, CandidateOption, CandidatesEnvelope,
    DataEnvelope, FaceMatchRequest, HrLoginResponse, LoginRequest, MatchesEnvelope,
    MessageResponse, ResetPasswordRequest, ScheduleMeetingResponse, VideoUploadUrlRequest,
    VideoUploadUrlResponse,
};
use shared::urls::{encode_segment, join_url};
use shared::{CandidateId, CandidateProfile, MatchResult, Meeting};
use thiserror::Error;
use web_sys::{AbortController, AbortSignal};

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {status} - {body}")]
    Server { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Request aborted")]
    Aborted,
}

impl ApiError {
    /// Text for the inline error box. Server replies are shown verbatim
    /// (their `detail` when they carry one); everything else gets
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server { body, .. } => find_detail(body)
                .or_else(|| {
                    let text = body.trim();
                    (!text.is_empty() && !text.starts_with('{')).then(|| text.to_string())
                })
                .unwrap_or_else(|| fallback.to_string()),
            _ => fallback.to_string(),
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }
}

/// Aborts every request that carries its signal when dropped. Components
/// keep one for their lifetime so unmounting cancels in-flight calls.
#[derive(Debug)]
pub struct AbortOnDrop {
    controller: Option<AbortController>,
}

impl AbortOnDrop {
    pub fn new() -> Self {
        Self {
            controller: AbortController::new().ok(),
        }
    }

    pub fn signal(&self) -> Option<AbortSignal> {
        self.controller.as_ref().map(|c| c.signal())
    }
}

impl Default for AbortOnDrop {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if let Some(controller) = &self.controller {
            controller.abort();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    api_base: String,
    gateway_base: String,
    storage_base: String,
    signal: Option<AbortSignal>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api_base: config.api_base_url.clone(),
            gateway_base: config.gateway_base_url.clone(),
            storage_base: config.storage_base_url.clone(),
            signal: None,
        }
    }

    pub fn with_abort(&self, guard: &AbortOnDrop) -> Self {
        Self {
            signal: guard.signal(),
            ..self.clone()
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.api_base, path)
    }

    fn gateway_url(&self, path: &str) -> String {
        if self.gateway_base.is_empty() {
            path.to_string()
        } else {
            join_url(&self.gateway_base, path)
        }
    }

    fn signed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.abort_signal(self.signal.as_ref())
    }

    fn transport_error(&self, err: gloo_net::Error) -> ApiError {
        if self.signal.as_ref().is_some_and(|s| s.aborted()) {
            ApiError::Aborted
        } else {
            ApiError::Network(err.to_string())
        }
    }

    async fn read<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        if !response.ok() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::warn!("{} answered {}: {}", response.url(), status, body);
            return Err(ApiError::Server { status, body });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .signed(Request::get(url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .signed(Request::post(url))
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.read(response).await
    }

    async fn post_form<T: DeserializeOwned>(&self, url: &str, body: String) -> Result<T, ApiError> {
        let request = self
            .signed(Request::post(url))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.read(response).await
    }

    fn unwrap_data<T>(envelope: DataEnvelope<T>) -> Result<T, ApiError> {
        envelope
            .data
            .ok_or_else(|| ApiError::Decode("response has no data".to_string()))
    }

    // Candidate

    pub async fn candidate_profile(
        &self,
        email: &str,
        nocache: bool,
    ) -> Result<CandidateProfile, ApiError> {
        let mut url = self.api_url(&format!("/api/candidate/{}", encode_segment(email)));
        if nocache {
            url.push_str(&format!("?nocache={}", js_sys::Date::now() as u64));
        }
        let envelope: DataEnvelope<CandidateProfile> = self.get(&url).await?;
        Ok(Self::unwrap_data(envelope)?.normalized(&self.storage_base))
    }

    pub async fn candidate_login(
        &self,
        request: &LoginRequest,
    ) -> Result<CandidateLoginResponse, ApiError> {
        self.post_json(&self.api_url("/api/candidate/login"), request)
            .await
    }

    pub async fn candidate_signup(&self, request: &LoginRequest) -> Result<MessageResponse, ApiError> {
        self.post_json(&self.api_url("/api/candidate/signup"), request)
            .await
    }

    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.post_json(&self.api_url("/api/candidate/reset-password"), request)
            .await
    }

    pub fn profile_update_url(&self) -> String {
        self.api_url("/api/candidate/update-details")
    }

    // HR

    pub async fn hr_login(&self, request: &LoginRequest) -> Result<HrLoginResponse, ApiError> {
        self.post_json(&self.api_url("/api/hr/login"), request).await
    }

    pub async fn match_statuses(&self) -> Result<Vec<CandidateMatchStatus>, ApiError> {
        let envelope: DataEnvelope<Vec<CandidateMatchStatus>> = self
            .get(&self.api_url("/api/hr/candidates/match-status"))
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn meetings(&self) -> Result<Vec<Meeting>, ApiError> {
        let envelope: DataEnvelope<Vec<Meeting>> = self.get(&self.api_url("/api/hr/meetings")).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn hr_candidate(&self, id: CandidateId) -> Result<CandidateProfile, ApiError> {
        let envelope: DataEnvelope<CandidateProfile> = self
            .get(&self.api_url(&format!("/api/hr/candidate/{}", id)))
            .await?;
        let mut profile = Self::unwrap_data(envelope)?.normalized(&self.storage_base);
        profile.id.get_or_insert(id);
        Ok(profile)
    }

    pub async fn candidate_options(&self) -> Result<Vec<CandidateOption>, ApiError> {
        let envelope: CandidatesEnvelope = self.get(&self.api_url("/api/hr/candidates")).await?;
        Ok(envelope.candidates.unwrap_or_default())
    }

    pub async fn schedule_meeting(&self, form_body: String) -> Result<ScheduleMeetingResponse, ApiError> {
        self.post_form(&self.api_url("/api/hr/meetings/schedule/"), form_body)
            .await
    }

    // Verification

    pub async fn match_history(&self, id: CandidateId) -> Result<Vec<MatchResult>, ApiError> {
        let envelope: MatchesEnvelope = self
            .get(&self.api_url(&format!("/api/verification/match/{}", id)))
            .await?;
        Ok(envelope.matches.unwrap_or_default())
    }

    pub async fn all_matches(&self, query: &str) -> Result<Vec<MatchResult>, ApiError> {
        let envelope: MatchesEnvelope = self
            .get(&self.api_url(&format!("/api/verification/match/all?{}", query)))
            .await?;
        Ok(envelope.matches.unwrap_or_default())
    }

    pub async fn video_upload_url(
        &self,
        request: &VideoUploadUrlRequest,
    ) -> Result<VideoUploadUrlResponse, ApiError> {
        self.post_json(&self.gateway_url("/api/uploads/video-url"), request)
            .await
    }

    pub async fn face_match(&self, request: &FaceMatchRequest) -> Result<MatchResult, ApiError> {
        self.post_json(&self.api_url("/api/verification/face-recognition"), request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_detail_wins_over_fallback() {
        let err = ApiError::Server {
            status: 401,
            body: r#"{"detail":"Invalid credentials"}"#.into(),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    }

    #[test]
    fn plain_text_bodies_are_shown_verbatim() {
        let err = ApiError::Server {
            status: 500,
            body: "Internal Server Error".into(),
        };
        assert_eq!(err.user_message("x"), "Internal Server Error");

        let opaque = ApiError::Server {
            status: 500,
            body: r#"{"error":"boom"}"#.into(),
        };
        assert_eq!(opaque.user_message("Try again"), "Try again");
    }

    #[test]
    fn transport_failures_use_fallback() {
        assert_eq!(
            ApiError::Network("offline".into()).user_message("Network error or failed to fetch data."),
            "Network error or failed to fetch data."
        );
        assert!(ApiError::Aborted.is_aborted());
    }
}
