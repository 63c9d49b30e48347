use uuid::Uuid;

use crate::files::FileMeta;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    InFlight,
    Succeeded,
    Failed(String),
}

/// Client-only record of one request body being transmitted. Progress
/// events carry the task id so late events from a superseded upload can be
/// told apart and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    id: Uuid,
    file: Option<FileMeta>,
    progress: u8,
    state: UploadState,
}

pub fn percent(loaded: f64, total: f64) -> u8 {
    if total.is_nan() || total <= 0.0 || !loaded.is_finite() {
        return 0;
    }
    ((loaded / total) * 100.0).floor().clamp(0.0, 100.0) as u8
}

impl UploadTask {
    pub fn start(file: Option<FileMeta>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            progress: 0,
            state: UploadState::InFlight,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file(&self) -> Option<&FileMeta> {
        self.file.as_ref()
    }

    /// Caption for the progress bar.
    pub fn label(&self) -> String {
        match self.file() {
            Some(meta) => format!("Uploading {}", meta.name),
            None => "Uploading".to_string(),
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn is_settled(&self) -> bool {
        self.state != UploadState::InFlight
    }

    /// Applies a byte-count event. Progress never moves backwards and is
    /// frozen once the task settles.
    pub fn record_progress(&mut self, loaded: f64, total: f64) -> u8 {
        if !self.is_settled() {
            self.progress = self.progress.max(percent(loaded, total));
        }
        self.progress
    }

    pub fn succeed(&mut self) {
        if !self.is_settled() {
            self.progress = 100;
            self.state = UploadState::Succeeded;
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        if !self.is_settled() {
            self.state = UploadState::Failed(message.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_handles_unknown_totals() {
        assert_eq!(percent(50.0, 0.0), 0);
        assert_eq!(percent(50.0, f64::NAN), 0);
        assert_eq!(percent(1.0, 3.0), 33);
        assert_eq!(percent(400.0, 200.0), 100);
    }

    #[test]
    fn progress_is_monotonic_and_freezes_after_settling() {
        let mut task = UploadTask::start(Some(FileMeta::new("cv.pdf", "application/pdf", 100)));
        task.record_progress(60.0, 100.0);
        task.record_progress(40.0, 100.0);
        assert_eq!(task.progress(), 60);

        task.fail("Something went wrong. Try again.");
        task.record_progress(100.0, 100.0);
        task.succeed();

        assert_eq!(task.progress(), 60);
        assert_eq!(
            task.state(),
            &UploadState::Failed("Something went wrong. Try again.".into())
        );
    }

    #[test]
    fn label_names_the_file_when_known() {
        let task = UploadTask::start(Some(FileMeta::new("interview.mp4", "video/mp4", 100)));
        assert_eq!(task.label(), "Uploading interview.mp4");
        assert_eq!(UploadTask::start(None).label(), "Uploading");
    }

    #[test]
    fn each_task_gets_its_own_id() {
        assert_ne!(UploadTask::start(None).id(), UploadTask::start(None).id());
    }
}
