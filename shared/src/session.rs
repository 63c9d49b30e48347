//! Login state for both portals.
//!
//! Candidate identity lives in the tab-scoped store and HR identity in the
//! persistent store. Neither carries a token: they only gate routes on the
//! client. All reads and writes go through [`Session`].

use crate::error::SessionError;

pub const CANDIDATE_EMAIL_KEY: &str = "candidateEmail";
pub const PROFILE_COMPLETE_KEY: &str = "hasCompletedProfile";
pub const HR_EMAIL_KEY: &str = "hr_email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreScope {
    /// Cleared when the tab closes.
    Tab,
    /// Survives restarts.
    Persistent,
}

pub trait SessionStore {
    fn get(&self, scope: StoreScope, key: &str) -> Option<String>;
    fn set(&self, scope: StoreScope, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, scope: StoreScope, key: &str);
}

/// Which side of the portal a protected route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Candidate,
    Hr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session<S> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn non_empty(&self, scope: StoreScope, key: &str) -> Option<String> {
        self.store
            .get(scope, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn candidate_email(&self) -> Option<String> {
        self.non_empty(StoreScope::Tab, CANDIDATE_EMAIL_KEY)
    }

    pub fn has_completed_profile(&self) -> bool {
        self.store
            .get(StoreScope::Tab, PROFILE_COMPLETE_KEY)
            .is_some_and(|v| v == "true")
    }

    pub fn begin_candidate(&self, email: &str, profile_complete: bool) -> Result<(), SessionError> {
        self.store.set(StoreScope::Tab, CANDIDATE_EMAIL_KEY, email.trim())?;
        self.store.set(
            StoreScope::Tab,
            PROFILE_COMPLETE_KEY,
            if profile_complete { "true" } else { "false" },
        )?;
        log::info!("Candidate session started for {}", email.trim());
        Ok(())
    }

    pub fn mark_profile_complete(&self) -> Result<(), SessionError> {
        self.store.set(StoreScope::Tab, PROFILE_COMPLETE_KEY, "true")
    }

    pub fn end_candidate(&self) {
        self.store.remove(StoreScope::Tab, CANDIDATE_EMAIL_KEY);
        self.store.remove(StoreScope::Tab, PROFILE_COMPLETE_KEY);
        log::info!("Candidate session cleared");
    }

    pub fn hr_email(&self) -> Option<String> {
        self.non_empty(StoreScope::Persistent, HR_EMAIL_KEY)
    }

    pub fn begin_hr(&self, email: &str) -> Result<(), SessionError> {
        self.store.set(StoreScope::Persistent, HR_EMAIL_KEY, email.trim())?;
        log::info!("HR session started for {}", email.trim());
        Ok(())
    }

    pub fn end_hr(&self) {
        self.store.remove(StoreScope::Persistent, HR_EMAIL_KEY);
        log::info!("HR session cleared");
    }

    /// Identity allowed into `area`, if any.
    pub fn identity_for(&self, area: Area) -> Option<String> {
        match area {
            Area::Candidate => self.candidate_email(),
            Area::Hr => self.hr_email(),
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Clone, Default)]
    pub struct MemoryStore {
        entries: Rc<RefCell<HashMap<(StoreScope, String), String>>>,
    }

    impl SessionStore for MemoryStore {
        fn get(&self, scope: StoreScope, key: &str) -> Option<String> {
            self.entries.borrow().get(&(scope, key.to_string())).cloned()
        }

        fn set(&self, scope: StoreScope, key: &str, value: &str) -> Result<(), SessionError> {
            self.entries
                .borrow_mut()
                .insert((scope, key.to_string()), value.to_string());
            Ok(())
        }

        fn remove(&self, scope: StoreScope, key: &str) {
            self.entries.borrow_mut().remove(&(scope, key.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;

    #[test]
    fn candidate_lifecycle() {
        let store = MemoryStore::default();
        let session = Session::new(store.clone());
        assert_eq!(session.identity_for(Area::Candidate), None);

        session.begin_candidate(" ana@x.io ", false).unwrap();
        assert_eq!(session.candidate_email().as_deref(), Some("ana@x.io"));
        assert!(!session.has_completed_profile());

        session.mark_profile_complete().unwrap();
        assert!(session.has_completed_profile());
        assert_eq!(
            store.get(StoreScope::Tab, PROFILE_COMPLETE_KEY).as_deref(),
            Some("true")
        );

        session.end_candidate();
        assert_eq!(session.candidate_email(), None);
        assert!(!session.has_completed_profile());
    }

    #[test]
    fn hr_identity_uses_persistent_scope() {
        let store = MemoryStore::default();
        let session = Session::new(store.clone());

        session.begin_hr("hr@corp.io").unwrap();

        assert_eq!(store.get(StoreScope::Tab, HR_EMAIL_KEY), None);
        assert_eq!(session.identity_for(Area::Hr).as_deref(), Some("hr@corp.io"));
        assert_eq!(session.identity_for(Area::Candidate), None);

        session.end_hr();
        assert_eq!(session.hr_email(), None);
    }

    #[test]
    fn blank_values_do_not_open_the_gate() {
        let store = MemoryStore::default();
        store.set(StoreScope::Tab, CANDIDATE_EMAIL_KEY, "  ").unwrap();
        assert_eq!(Session::new(store).candidate_email(), None);
    }
}
