//! # Change Detection
//!
//! Hashes a canonical encoding of the route model and compares it with the
//! hash persisted by the last successful run. Unchanged models skip cleanup
//! and generation entirely.

use crate::error::{AppError, AppResult};
use crate::model::{HandlerAction, RouteModel};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Bumped whenever the generated artifact layout changes.
const FINGERPRINT_FORMAT: u32 = 1;

/// Storage for the last recorded model hash.
pub trait HashStore {
    /// The previously recorded hash, if any.
    fn load(&self) -> AppResult<Option<String>>;

    /// Records `hash` as the current one.
    fn save(&self, hash: &str) -> AppResult<()>;
}

/// Keeps the hash in a plain text marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHashStore {
    path: PathBuf,
}

impl FileHashStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Removes the marker; a missing marker is not an error.
    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Write {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

impl HashStore for FileHashStore {
    fn load(&self) -> AppResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::FileRead {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&self, hash: &str) -> AppResult<()> {
        fs::write(&self.path, hash).map_err(|e| AppError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// In-memory store, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryHashStore {
    hash: RefCell<Option<String>>,
}

impl MemoryHashStore {
    /// Store pre-seeded with `hash`.
    pub fn with_hash(hash: impl Into<String>) -> Self {
        Self {
            hash: RefCell::new(Some(hash.into())),
        }
    }

    /// Current contents.
    pub fn current(&self) -> Option<String> {
        self.hash.borrow().clone()
    }
}

impl HashStore for MemoryHashStore {
    fn load(&self) -> AppResult<Option<String>> {
        Ok(self.current())
    }

    fn save(&self, hash: &str) -> AppResult<()> {
        self.hash.replace(Some(hash.to_string()));
        Ok(())
    }
}

/// Settings besides the model that shape the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings<'a> {
    /// Global url prefix.
    pub route_prefix: &'a str,
    /// File name prefix of artifacts.
    pub artifact_prefix: &'a str,
    /// Identity of the registration strategy, see
    /// [`RegistrationStrategy::fingerprint`](crate::strategies::RegistrationStrategy::fingerprint).
    pub strategy: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Fingerprint<'a> {
    format: u32,
    settings: OutputSettings<'a>,
    actions: &'a [HandlerAction],
}

/// Hex SHA-256 of the canonical model encoding.
///
/// The output settings are part of the fingerprint: changing any of them
/// changes the generated files even when the model does not.
pub fn model_hash(model: &RouteModel, settings: OutputSettings<'_>) -> AppResult<String> {
    let fingerprint = Fingerprint {
        format: FINGERPRINT_FORMAT,
        settings,
        actions: &model.actions,
    };
    let encoded = serde_json::to_string(&fingerprint)
        .map_err(|e| AppError::General(format!("Failed to encode route model: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(encoded.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Outcome of comparing the current model with the stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
    /// Stored hash matches; nothing to do.
    Unchanged {
        /// Hash of the current model.
        hash: String,
    },
    /// Regeneration required; `hash` should be recorded once it succeeds.
    Changed {
        /// Hash of the current model.
        hash: String,
        /// Hash found in the store, if any.
        previous: Option<String>,
    },
}

/// Gate between model building and generation.
pub struct ChangeDetector<'s, S: HashStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: HashStore + ?Sized> ChangeDetector<'s, S> {
    /// Detector reading from and writing to `store`.
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Compares the model against the stored hash. `force` always reports a change.
    pub fn check(
        &self,
        model: &RouteModel,
        settings: OutputSettings<'_>,
        force: bool,
    ) -> AppResult<ChangeStatus> {
        let hash = model_hash(model, settings)?;
        let previous = self.store.load()?;
        if !force && previous.as_deref() == Some(hash.as_str()) {
            return Ok(ChangeStatus::Unchanged { hash });
        }
        Ok(ChangeStatus::Changed { hash, previous })
    }

    /// Records a hash after generation succeeded.
    pub fn commit(&self, hash: &str) -> AppResult<()> {
        self.store.save(hash)
    }
}
