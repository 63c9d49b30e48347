use gloo_storage::{LocalStorage, SessionStorage, Storage};
use shared::SessionError;
use shared::session::{SessionStore, StoreScope};

/// Tab scope maps to `sessionStorage`, persistent scope to `localStorage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrowserStore;

impl SessionStore for BrowserStore {
    fn get(&self, scope: StoreScope, key: &str) -> Option<String> {
        match scope {
            StoreScope::Tab => SessionStorage::raw().get_item(key).ok().flatten(),
            StoreScope::Persistent => LocalStorage::raw().get_item(key).ok().flatten(),
        }
    }

    fn set(&self, scope: StoreScope, key: &str, value: &str) -> Result<(), SessionError> {
        let storage = match scope {
            StoreScope::Tab => SessionStorage::raw(),
            StoreScope::Persistent => LocalStorage::raw(),
        };
        storage
            .set_item(key, value)
            .map_err(|e| SessionError::StoreUnavailable(format!("{:?}", e)))
    }

    fn remove(&self, scope: StoreScope, key: &str) {
        match scope {
            StoreScope::Tab => SessionStorage::delete(key),
            StoreScope::Persistent => LocalStorage::delete(key),
        }
    }
}
