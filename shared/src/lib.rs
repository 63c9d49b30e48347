pub mod analytics;
pub mod auth;
pub mod confidence;
pub mod error;
pub mod export;
pub mod files;
pub mod meetings;
pub mod models;
pub mod profile;
pub mod session;
pub mod upload;
pub mod urls;
pub mod video;

pub use confidence::ConfidenceTier;
pub use error::{SessionError, ValidationError};
pub use models::{CandidateId, CandidateProfile, MatchResult, Meeting};
