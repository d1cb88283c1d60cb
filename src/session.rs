//! Token store for the travel-planning service session.
//!
//! The browser original kept two strings in local storage (`access_token`
//! and `access_expires_at`) and read them ambiently from every call site.
//! Here the session is an explicit, mutex-guarded object with pluggable
//! persistence, so writers are serialized and the forced-logout path can
//! clear both values together.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};
use time::OffsetDateTime;

use crate::error::{Error, Result};

/// Token payload returned by the login, signup, and refresh endpoints.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    /// The bearer credential for subsequent API calls.
    pub access_token: String,
    /// Lifetime of the access token in seconds, when the server reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// The two persisted session values, stored and cleared together.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredSession {
    /// The access token string.
    pub access_token: String,
    /// Expiry as unix milliseconds, if the token carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_expires_at: Option<i64>,
}

/// Persistence backend for the session.
pub trait SessionStorage: Send + Sync {
    /// Loads the persisted session, if one exists.
    fn load(&self) -> Result<Option<StoredSession>>;

    /// Persists the session, replacing any previous value.
    fn store(&self, session: &StoredSession) -> Result<()>;

    /// Removes the persisted session.
    fn clear(&self) -> Result<()>;
}

/// In-memory storage, for tests and short-lived sessions.
#[derive(Default)]
pub struct MemoryStorage {
    session: Mutex<Option<StoredSession>>,
}

impl MemoryStorage {
    /// Creates empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.session.lock().expect("session lock poisoned").clone())
    }

    fn store(&self, session: &StoredSession) -> Result<()> {
        *self.session.lock().expect("session lock poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.session.lock().expect("session lock poisoned") = None;
        Ok(())
    }
}

/// File-backed storage: a single JSON document holding both values.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates storage backed by the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<StoredSession>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::io("failed to open session file", err)),
        };
        let reader = BufReader::new(file);
        let session = from_reader(reader).map_err(|err| {
            Error::serialization("failed to parse session file", Some(Box::new(err)))
        })?;
        Ok(Some(session))
    }

    fn store(&self, session: &StoredSession) -> Result<()> {
        let file = File::create(&self.path)
            .map_err(|err| Error::io("failed to create session file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, session).map_err(|err| {
            Error::serialization("failed to serialize session", Some(Box::new(err)))
        })
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::io("failed to remove session file", err)),
        }
    }
}

/// Mutex-guarded session state plus its persistence backend.
///
/// Last write wins; concurrent refreshes are not deduplicated, but the
/// mutex keeps each write atomic with its persistence.
pub struct SessionStore {
    inner: Mutex<Option<StoredSession>>,
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    /// Creates a store over the given backend, loading any persisted session.
    pub fn new(storage: Box<dyn SessionStorage>) -> Result<Self> {
        let session = storage.load()?;
        Ok(Self {
            inner: Mutex::new(session),
            storage,
        })
    }

    /// Creates an in-memory store with no persisted state.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(None),
            storage: Box::new(MemoryStorage::new()),
        }
    }

    /// Returns the current access token, if one is held.
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Returns the recorded expiry as unix milliseconds, if any.
    pub fn expires_at(&self) -> Option<i64> {
        self.inner
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .and_then(|s| s.access_expires_at)
    }

    /// Returns true iff an access token is present and, when an expiry is
    /// recorded, it has not elapsed.
    pub fn is_authenticated(&self) -> bool {
        let guard = self.inner.lock().expect("session lock poisoned");
        let Some(session) = guard.as_ref() else {
            return false;
        };
        match session.access_expires_at {
            Some(expires_at) => now_unix_ms() <= expires_at,
            None => true,
        }
    }

    /// Applies a token response, computing the expiry from `expires_in`.
    pub fn apply(&self, response: &TokenResponse) -> Result<()> {
        let access_expires_at = response
            .expires_in
            .map(|seconds| now_unix_ms() + (seconds as i64) * 1000);
        let session = StoredSession {
            access_token: response.access_token.clone(),
            access_expires_at,
        };
        self.storage.store(&session)?;
        *self.inner.lock().expect("session lock poisoned") = Some(session);
        Ok(())
    }

    /// Clears the in-memory session and the persisted values together.
    pub fn clear(&self) -> Result<()> {
        self.storage.clear()?;
        *self.inner.lock().expect("session lock poisoned") = None;
        Ok(())
    }
}

fn now_unix_ms() -> i64 {
    let now = OffsetDateTime::now_utc();
    (now.unix_timestamp_nanos() / 1_000_000) as i64
}
