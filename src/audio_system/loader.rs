//! Asynchronous asset loading
//!
//! Every load runs on its own worker thread: fetch the bytes (local folder or
//! HTTP), decode them, then publish the outcome through a [`LoadTask`]. Loads
//! are independent of each other and have no timeout; a fetch that never
//! returns leaves its task pending forever.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use super::buffer::SoundBuffer;
use crate::error::AudioError;

/// Folder the assets are served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRoot {
    /// Local directory
    Directory(PathBuf),

    /// Base URL, fetched over HTTP(S)
    Remote(String),
}

impl AssetRoot {
    /// Parse a root string; `http://` and `https://` prefixes select a remote root
    pub fn parse(root: &str) -> Self {
        if root.starts_with("http://") || root.starts_with("https://") {
            AssetRoot::Remote(root.trim_end_matches('/').to_string())
        } else {
            AssetRoot::Directory(PathBuf::from(root))
        }
    }

    /// Location of a file under this root, as shown in logs and errors
    pub fn locate(&self, file_name: &str) -> String {
        match self {
            AssetRoot::Directory(dir) => dir.join(file_name).display().to_string(),
            AssetRoot::Remote(base) => format!("{}/{}", base, file_name.trim_start_matches('/')),
        }
    }

    /// Read the raw bytes of a file under this root
    pub fn fetch(&self, file_name: &str) -> Result<Vec<u8>, AudioError> {
        let location = self.locate(file_name);
        let fetch_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            AudioError::FetchFailed {
                path: location.clone(),
                source,
            }
        };

        match self {
            AssetRoot::Directory(dir) => {
                std::fs::read(dir.join(file_name)).map_err(|e| fetch_failed(Box::new(e)))
            }
            AssetRoot::Remote(_) => {
                let response = ureq::get(&location)
                    .call()
                    .map_err(|e| fetch_failed(Box::new(e)))?;
                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| fetch_failed(Box::new(e)))?;
                Ok(bytes)
            }
        }
    }

    /// Fetch and decode a file under this root
    pub fn load(&self, file_name: &str) -> Result<SoundBuffer, AudioError> {
        let bytes = self.fetch(file_name)?;
        let size = bytes.len();
        let buffer = SoundBuffer::decode(bytes).map_err(|e| AudioError::DecodeFailed {
            path: self.locate(file_name),
            source: Box::new(e),
        })?;

        tracing::info!(
            "Loaded audio asset {} ({} bytes, {:.2}s, {} ch @ {} Hz)",
            self.locate(file_name),
            size,
            buffer.duration_secs(),
            buffer.channels(),
            buffer.sample_rate()
        );
        Ok(buffer)
    }
}

impl Default for AssetRoot {
    fn default() -> Self {
        AssetRoot::parse(super::DEFAULT_ASSET_ROOT)
    }
}

impl fmt::Display for AssetRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRoot::Directory(dir) => write!(f, "{}", dir.display()),
            AssetRoot::Remote(base) => write!(f, "{}", base),
        }
    }
}

/// Coarse outcome of a load, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed,
}

enum Outcome<T> {
    Pending,
    Loaded(T),
    Failed(Arc<AudioError>),
}

struct Shared<T> {
    outcome: Mutex<Outcome<T>>,
    done: Condvar,
}

/// Handle to an asset load running in the background
///
/// Clones observe the same load. Dropping every handle does not cancel the
/// load; the asset still lands wherever the worker publishes it.
pub struct LoadTask<T> {
    location: String,
    shared: Arc<Shared<T>>,
}

impl<T> Clone for LoadTask<T> {
    fn clone(&self) -> Self {
        Self {
            location: self.location.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Send + 'static> LoadTask<T> {
    /// Run `job` on a dedicated worker thread
    pub fn spawn<F>(location: String, job: F) -> Self
    where
        F: FnOnce() -> Result<T, AudioError> + Send + 'static,
    {
        let task = Self::pending(location.clone());
        let worker = task.clone();

        let spawned = thread::Builder::new()
            .name("audio-loader".to_string())
            .spawn(move || worker.complete(job()));

        if let Err(source) = spawned {
            task.complete(Err(AudioError::LoaderSpawnFailed {
                path: location,
                source,
            }));
        }
        task
    }

    fn pending(location: String) -> Self {
        Self {
            location,
            shared: Arc::new(Shared {
                outcome: Mutex::new(Outcome::Pending),
                done: Condvar::new(),
            }),
        }
    }

    fn complete(&self, result: Result<T, AudioError>) {
        let mut outcome = self.shared.outcome.lock();
        *outcome = match result {
            Ok(value) => Outcome::Loaded(value),
            Err(e) => Outcome::Failed(Arc::new(e)),
        };
        self.shared.done.notify_all();
    }

    /// Where the asset is being loaded from
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn status(&self) -> LoadStatus {
        match *self.shared.outcome.lock() {
            Outcome::Pending => LoadStatus::Pending,
            Outcome::Loaded(_) => LoadStatus::Loaded,
            Outcome::Failed(_) => LoadStatus::Failed,
        }
    }

    /// Loaded value, if the load already succeeded
    pub fn loaded(&self) -> Option<T> {
        match &*self.shared.outcome.lock() {
            Outcome::Loaded(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Block until the load finishes
    pub fn wait(&self) -> Result<T, Arc<AudioError>> {
        let mut outcome = self.shared.outcome.lock();
        loop {
            if let Some(result) = Self::settle(&outcome) {
                return result;
            }
            self.shared.done.wait(&mut outcome);
        }
    }

    /// Block until the load finishes or `timeout` elapses; `None` on timeout
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T, Arc<AudioError>>> {
        let mut outcome = self.shared.outcome.lock();
        if matches!(*outcome, Outcome::Pending) {
            let _ = self
                .shared
                .done
                .wait_while_for(&mut outcome, |o| matches!(o, Outcome::Pending), timeout);
        }
        Self::settle(&outcome)
    }

    fn settle(outcome: &Outcome<T>) -> Option<Result<T, Arc<AudioError>>> {
        match outcome {
            Outcome::Pending => None,
            Outcome::Loaded(value) => Some(Ok(value.clone())),
            Outcome::Failed(e) => Some(Err(Arc::clone(e))),
        }
    }
}
