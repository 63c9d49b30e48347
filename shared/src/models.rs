use derive_more::{Display, From};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::urls::normalize_document_url;

/// Backend sends `null` for blank columns; treat those as the type default.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display(fmt = "{}", _0)]
pub struct CandidateId(pub u64);

impl FromStr for CandidateId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(CandidateId)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub id: Option<CandidateId>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub phone: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub id_proof: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub verified: bool,
}

impl CandidateProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Rewrites document references into absolute URLs (or drops blanks).
    pub fn normalized(mut self, storage_base: &str) -> Self {
        self.photo = normalize_document_url(storage_base, self.photo.as_deref());
        self.id_proof = normalize_document_url(storage_base, self.id_proof.as_deref());
        self.resume = normalize_document_url(storage_base, self.resume.as_deref());
        self
    }
}

/// `{"data": ...}` wrapper used by the candidate, HR and meeting endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchesEnvelope {
    pub matches: Option<Vec<MatchResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidatesEnvelope {
    pub candidates: Option<Vec<CandidateOption>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateSummary {
    #[serde(default, deserialize_with = "null_to_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub id_proof: Option<String>,
}

impl CandidateSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One face-match verdict computed by the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: u64,
    #[serde(default)]
    pub candidate_id: Option<CandidateId>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub match_found: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub matching_frames: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub checked_frames: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub candidate: Option<CandidateSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub candidate_id: CandidateId,
    #[serde(default, deserialize_with = "null_to_default")]
    pub scheduled_at: String,
    #[serde(default)]
    pub join_url: Option<String>,
}

/// Row of the HR dashboard table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatchStatus {
    pub id: CandidateId,
    #[serde(default, deserialize_with = "null_to_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub verified: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub match_found: bool,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub id_proof: Option<String>,
}

impl CandidateMatchStatus {
    pub fn confidence_display(&self) -> String {
        format!("{:.2}", self.confidence_score.unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateOption {
    pub id: CandidateId,
    #[serde(default, deserialize_with = "null_to_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateLoginResponse {
    #[serde(rename = "hasCompletedProfile", default, deserialize_with = "null_to_default")]
    pub has_completed_profile: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HrLoginResponse {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleMeetingResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub success: bool,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

/// JSON part of the multipart profile update. Only `email` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdateData {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceMatchRequest {
    pub candidate_id: CandidateId,
    pub video_filename: String,
    pub video_url: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoUploadUrlRequest {
    pub candidate_id: CandidateId,
    pub content_type: String,
}

/// Short-lived PUT grant issued by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoUploadUrlResponse {
    pub object_key: String,
    pub upload_url: String,
    pub object_url: String,
    pub expires_in_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_tolerates_nulls_and_missing_fields() {
        let body = r#"{"data":{"email":"a@b.c","first_name":null,"photo":"/n/ns/b/docs/o/p.png"}}"#;
        let env: DataEnvelope<CandidateProfile> = serde_json::from_str(body).unwrap();
        let profile = env.data.unwrap().normalized("https://storage.example.com");

        assert_eq!(profile.first_name, "");
        assert_eq!(profile.id_proof, None);
        assert_eq!(
            profile.photo.as_deref(),
            Some("https://storage.example.com/n/ns/b/docs/o/p.png")
        );
    }

    #[test]
    fn match_result_parses_backend_shape() {
        let body = r#"{"matches":[{"id":7,"confidence_score":0.91,"match_found":true,
            "matching_frames":18,"checked_frames":20,"status":"Match Found",
            "created_at":"2025-03-01T10:00:00","candidate":{"first_name":"Ana","last_name":"Ruiz","email":"ana@x.io"}}]}"#;
        let env: MatchesEnvelope = serde_json::from_str(body).unwrap();
        let matches = env.matches.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matching_frames, 18);
        assert_eq!(matches[0].candidate.as_ref().unwrap().full_name(), "Ana Ruiz");
    }

    #[test]
    fn update_data_omits_unchanged_fields() {
        let data = ProfileUpdateData {
            email: "a@b.c".into(),
            phone: Some("555".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"email":"a@b.c","phone":"555"}"#);
    }

    #[test]
    fn missing_confidence_renders_as_zero() {
        let row: CandidateMatchStatus =
            serde_json::from_str(r#"{"id":3,"first_name":"Li","confidence_score":null}"#).unwrap();
        assert_eq!(row.confidence_display(), "0.00");
        assert_eq!(row.id, CandidateId(3));
    }

    #[test]
    fn candidate_id_parses_route_segment() {
        assert_eq!(" 42".parse::<CandidateId>().unwrap(), CandidateId(42));
        assert!("abc".parse::<CandidateId>().is_err());
    }
}
