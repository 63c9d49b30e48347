use thiserror::Error;

/// Local rule violations caught before any request leaves the browser.
///
/// The `Display` text is what the user sees next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required except file uploads.")]
    MissingRequiredFields,

    #[error("File size exceeds {limit_mb}MB limit.")]
    FileTooLarge { limit_mb: u64 },

    #[error("Unsupported file type for {label}. Allowed: {allowed}.")]
    UnsupportedDocumentType {
        label: &'static str,
        allowed: &'static str,
    },

    #[error("Invalid file format. Please upload a video file (MP4, AVI, MKV, MOV, WebM).")]
    UnsupportedVideoType,

    #[error("Please select a video file to upload.")]
    NoVideoSelected,

    #[error("Email and password are required.")]
    MissingCredentials,

    #[error("Passwords do not match!")]
    PasswordMismatch,

    #[error("Candidate ID is missing. Please try again.")]
    MissingCandidateId,

    #[error("Candidate email is missing!")]
    MissingCandidateEmail,

    #[error("HR email not found. Please log in again.")]
    MissingHrSession,

    #[error("Please select a valid date and time.")]
    MissingMeetingTime,

    #[error("Invalid meeting time: {0}")]
    InvalidMeetingTime(String),

    #[error("Minimum confidence must be a number between 0 and 1.")]
    InvalidConfidenceFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Browser storage unavailable: {0}")]
    StoreUnavailable(String),
}
