use std::cell::RefCell;

use gloo_storage::{SessionStorage, Storage, errors::StorageError};

use crate::config::Config;
use crate::models::{
    error::AppError,
    selection::{PersistedSelection, Selection},
};

/// Raw key/value storage for the persisted selection.
pub trait SelectionBackend {
    fn read(&self, key: &str) -> Result<Option<String>, AppError>;
    fn write(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str);
}

/// Browser session storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionBackend;

impl SelectionBackend for SessionBackend {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        match SessionStorage::get::<serde_json::Value>(key) {
            Ok(value) => Ok(Some(value.to_string())),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(e)) => Err(AppError::MalformedPersistedState(e.to_string())),
            Err(e) => Err(AppError::ConfigError(format!("Session storage unavailable: {e}"))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        SessionStorage::raw()
            .set_item(key, value)
            .map_err(|e| AppError::ConfigError(format!("Failed to write session storage: {e:?}")))
    }

    fn remove(&self, key: &str) {
        SessionStorage::delete(key);
    }
}

/// In-memory storage for non-browser builds and tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    value: RefCell<Option<(String, String)>>,
}

impl MemoryBackend {
    pub fn with_value(key: &str, value: &str) -> Self {
        Self {
            value: RefCell::new(Some((key.to_string(), value.to_string()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.value.borrow().as_ref().map(|(_, v)| v.clone())
    }
}

impl SelectionBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .value
            .borrow()
            .as_ref()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        *self.value.borrow_mut() = Some((key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) {
        let mut value = self.value.borrow_mut();
        if value.as_ref().is_some_and(|(k, _)| k == key) {
            *value = None;
        }
    }
}

/// The persisted filter selection.
///
/// Read once when opened and written on every change. Stored state that
/// cannot be read is replaced by the default selection; the error is kept
/// for the caller to log and never surfaced as a failure.
pub struct SelectionStore<B: SelectionBackend> {
    backend: B,
    key: String,
    current: Selection,
    recovered: Option<AppError>,
}

impl<B: SelectionBackend> SelectionStore<B> {
    pub fn open(backend: B) -> Self {
        Self::open_with_key(backend, Config::SELECTION_STORAGE_KEY)
    }

    pub fn open_with_key(backend: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let (current, recovered) = match backend.read(&key) {
            Ok(None) => (Selection::default(), None),
            Ok(Some(raw)) => match Selection::try_restore(&raw) {
                Ok(selection) => (selection, None),
                Err(e) => (Selection::default(), Some(e)),
            },
            Err(e) => (Selection::default(), Some(e)),
        };

        Self {
            backend,
            key,
            current,
            recovered,
        }
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    /// Error replaced by the default selection when opening, if any.
    pub fn recovered_error(&self) -> Option<&AppError> {
        self.recovered.as_ref()
    }

    /// Records a new selection. The in-memory value is updated even when
    /// the write fails.
    pub fn update(&mut self, selection: Selection) -> Result<(), AppError> {
        if selection == self.current {
            return Ok(());
        }
        self.current = selection;
        self.persist()
    }

    /// Restores the default selection and clears stored state.
    pub fn reset(&mut self) {
        self.current = Selection::default();
        self.backend.remove(&self.key);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn persist(&self) -> Result<(), AppError> {
        let shape: PersistedSelection = self.current.to_persisted();
        let json = serde_json::to_string(&shape)
            .map_err(|e| AppError::DataError(format!("Failed to encode selection: {e}")))?;
        self.backend.write(&self.key, &json)
    }
}
