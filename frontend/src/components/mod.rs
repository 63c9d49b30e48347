pub mod analytics;
pub mod candidate_dashboard;
pub mod candidate_details;
pub mod candidate_login;
pub mod candidate_signup;
pub mod charts;
pub mod documents;
pub mod header;
pub mod hr_candidate_details;
pub mod hr_dashboard;
pub mod hr_home;
pub mod hr_login;
pub mod match_history;
pub mod match_result;
pub mod schedule_meeting;
pub mod theme_toggle;
pub mod utils;
pub mod video_capture;
pub mod video_upload;
