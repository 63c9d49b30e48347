//! Editable state behind the candidate document form.
//!
//! Generic over the file handle `F` so the browser can keep its own file
//! objects in the slots while the rules stay testable natively.

use crate::error::{SessionError, ValidationError};
use crate::files::{DocumentKind, FileMeta};
use crate::models::{CandidateProfile, ProfileUpdateData};
use crate::session::{Session, SessionStore};

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSlot<F> {
    Empty,
    /// URL of the document already held by the backend.
    Stored(String),
    /// A file picked in this session, not yet sent.
    Chosen { file: F, meta: FileMeta },
}

impl<F> DocumentSlot<F> {
    pub fn from_url(url: Option<String>) -> Self {
        match url {
            Some(url) => DocumentSlot::Stored(url),
            None => DocumentSlot::Empty,
        }
    }

    pub fn stored_url(&self) -> Option<&str> {
        match self {
            DocumentSlot::Stored(url) => Some(url),
            _ => None,
        }
    }

    pub fn chosen(&self) -> Option<(&F, &FileMeta)> {
        match self {
            DocumentSlot::Chosen { file, meta } => Some((file, meta)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    FirstName,
    LastName,
    Address,
    Phone,
}

impl TextField {
    pub const ALL: [TextField; 4] = [
        TextField::FirstName,
        TextField::LastName,
        TextField::Address,
        TextField::Phone,
    ];

    pub fn placeholder(&self) -> &'static str {
        match self {
            TextField::FirstName => "First Name",
            TextField::LastName => "Last Name",
            TextField::Address => "Address",
            TextField::Phone => "Phone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileFields {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
}

impl ProfileFields {
    fn get(&self, field: TextField) -> &str {
        match field {
            TextField::FirstName => &self.first_name,
            TextField::LastName => &self.last_name,
            TextField::Address => &self.address,
            TextField::Phone => &self.phone,
        }
    }

    fn get_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::FirstName => &mut self.first_name,
            TextField::LastName => &mut self.last_name,
            TextField::Address => &mut self.address,
            TextField::Phone => &mut self.phone,
        }
    }
}

impl From<&CandidateProfile> for ProfileFields {
    fn from(profile: &CandidateProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            address: profile.address.clone(),
            phone: profile.phone.clone(),
        }
    }
}

/// Everything needed to build the multipart update request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSubmission<F> {
    pub update_data: ProfileUpdateData,
    pub files: Vec<(DocumentKind, F)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentForm<F> {
    email: String,
    snapshot: ProfileFields,
    fields: ProfileFields,
    photo: DocumentSlot<F>,
    id_proof: DocumentSlot<F>,
    resume: DocumentSlot<F>,
    consent: bool,
}

impl<F: Clone> DocumentForm<F> {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            snapshot: ProfileFields::default(),
            fields: ProfileFields::default(),
            photo: DocumentSlot::Empty,
            id_proof: DocumentSlot::Empty,
            resume: DocumentSlot::Empty,
            consent: false,
        }
    }

    /// Fills the form from a fetched (already normalised) profile.
    pub fn load(&mut self, profile: &CandidateProfile) {
        self.snapshot = ProfileFields::from(profile);
        self.fields = self.snapshot.clone();
        self.photo = DocumentSlot::from_url(profile.photo.clone());
        self.id_proof = DocumentSlot::from_url(profile.id_proof.clone());
        self.resume = DocumentSlot::from_url(profile.resume.clone());
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn field(&self, field: TextField) -> &str {
        self.fields.get(field)
    }

    pub fn set_field(&mut self, field: TextField, value: impl Into<String>) {
        *self.fields.get_mut(field) = value.into();
    }

    pub fn fields(&self) -> &ProfileFields {
        &self.fields
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    pub fn set_consent(&mut self, consent: bool) {
        self.consent = consent;
    }

    pub fn slot(&self, kind: DocumentKind) -> &DocumentSlot<F> {
        match kind {
            DocumentKind::Photo => &self.photo,
            DocumentKind::IdProof => &self.id_proof,
            DocumentKind::Resume => &self.resume,
        }
    }

    fn slot_mut(&mut self, kind: DocumentKind) -> &mut DocumentSlot<F> {
        match kind {
            DocumentKind::Photo => &mut self.photo,
            DocumentKind::IdProof => &mut self.id_proof,
            DocumentKind::Resume => &mut self.resume,
        }
    }

    /// Puts a picked file into its slot. A rejected file leaves the slot
    /// exactly as it was.
    pub fn select_file(
        &mut self,
        kind: DocumentKind,
        file: F,
        meta: FileMeta,
    ) -> Result<(), ValidationError> {
        kind.check(&meta)?;
        *self.slot_mut(kind) = DocumentSlot::Chosen { file, meta };
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = TextField::ALL
            .iter()
            .any(|f| self.fields.get(*f).trim().is_empty());
        if missing || !self.consent {
            return Err(ValidationError::MissingRequiredFields);
        }
        Ok(())
    }

    pub fn prepare_submission(&self) -> Result<ProfileSubmission<F>, ValidationError> {
        self.validate()?;

        let changed = |field: TextField| {
            let now = self.fields.get(field);
            (now != self.snapshot.get(field)).then(|| now.to_string())
        };

        let update_data = ProfileUpdateData {
            email: self.email.clone(),
            first_name: changed(TextField::FirstName),
            last_name: changed(TextField::LastName),
            address: changed(TextField::Address),
            phone: changed(TextField::Phone),
        };

        let files = [DocumentKind::IdProof, DocumentKind::Photo, DocumentKind::Resume]
            .into_iter()
            .filter_map(|kind| {
                self.slot(kind)
                    .chosen()
                    .map(|(file, _)| (kind, file.clone()))
            })
            .collect();

        Ok(ProfileSubmission { update_data, files })
    }

    /// Called after the backend accepted the update: what was typed becomes
    /// the new baseline.
    pub fn commit(&mut self) {
        self.snapshot = self.fields.clone();
    }

    /// Success transition of the form: the profile counts as complete for
    /// the rest of the session and the saved values become the baseline.
    /// The baseline moves even when the flag cannot be stored.
    pub fn accept_update<S: SessionStore>(&mut self, session: &Session<S>) -> Result<(), SessionError> {
        self.commit();
        session.mark_profile_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::MAX_DOCUMENT_BYTES;
    use crate::session::memory::MemoryStore;

    fn loaded_form() -> DocumentForm<&'static str> {
        let mut form = DocumentForm::new("ana@x.io");
        form.load(&CandidateProfile {
            email: "ana@x.io".into(),
            first_name: "Ana".into(),
            last_name: "Ruiz".into(),
            address: "1 Main St".into(),
            phone: "555-0100".into(),
            photo: Some("https://os/photo.png".into()),
            resume: Some("https://os/cv.pdf".into()),
            ..Default::default()
        });
        form
    }

    #[test]
    fn empty_required_field_blocks_submission() {
        let mut form = loaded_form();
        form.set_consent(true);
        form.set_field(TextField::Address, "   ");

        assert_eq!(
            form.prepare_submission(),
            Err(ValidationError::MissingRequiredFields)
        );
    }

    #[test]
    fn consent_is_required() {
        let form = loaded_form();
        assert_eq!(form.validate(), Err(ValidationError::MissingRequiredFields));
    }

    #[test]
    fn oversized_file_keeps_stored_reference() {
        let mut form = loaded_form();
        let big = FileMeta::new("me.png", "image/png", MAX_DOCUMENT_BYTES + 1);

        let err = form.select_file(DocumentKind::Photo, "handle", big).unwrap_err();

        assert_eq!(err, ValidationError::FileTooLarge { limit_mb: 5 });
        assert_eq!(
            form.slot(DocumentKind::Photo).stored_url(),
            Some("https://os/photo.png")
        );
    }

    #[test]
    fn only_new_files_and_changed_fields_are_sent() {
        let mut form = loaded_form();
        form.set_consent(true);
        form.set_field(TextField::Phone, "555-0199");
        form.select_file(
            DocumentKind::IdProof,
            "id-file",
            FileMeta::new("id.jpg", "image/jpeg", 2048),
        )
        .unwrap();

        let submission = form.prepare_submission().unwrap();

        assert_eq!(submission.update_data.email, "ana@x.io");
        assert_eq!(submission.update_data.phone.as_deref(), Some("555-0199"));
        assert_eq!(submission.update_data.first_name, None);
        assert_eq!(submission.files, vec![(DocumentKind::IdProof, "id-file")]);
    }

    #[test]
    fn commit_makes_typed_values_the_baseline() {
        let mut form = loaded_form();
        form.set_consent(true);
        form.set_field(TextField::FirstName, "Anna");
        assert_eq!(
            form.prepare_submission().unwrap().update_data.first_name.as_deref(),
            Some("Anna")
        );

        form.commit();

        assert_eq!(form.field(TextField::FirstName), "Anna");
        assert_eq!(form.prepare_submission().unwrap().update_data.first_name, None);
    }

    #[test]
    fn accepted_update_completes_the_profile() {
        let session = Session::new(MemoryStore::default());
        session.begin_candidate("ana@x.io", false).unwrap();
        let mut form = loaded_form();
        form.set_consent(true);
        form.set_field(TextField::Phone, "555-0199");

        form.accept_update(&session).unwrap();

        assert!(session.has_completed_profile());
        assert_eq!(session.candidate_email().as_deref(), Some("ana@x.io"));
        let resubmit = form.prepare_submission().unwrap();
        assert_eq!(resubmit.update_data.phone, None);
        assert_eq!(form.field(TextField::Phone), "555-0199");
    }
}
