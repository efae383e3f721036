//! Serialized access to a search backend
//!
//! A backend is owned by exactly one [`SearchHandle`] (cheaply cloneable).
//! Every call takes the backend lock on the blocking thread pool, so at most
//! one request is inside the backend at any time and the async runtime never
//! waits on it directly.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::timeout;

use super::{IndexInfo, Result, SearchBackend, SearchError};

/// Default upper bound for a single backend call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct SearchHandle {
    backend: Arc<Mutex<Box<dyn SearchBackend>>>,
    timeout: Duration,
}

impl SearchHandle {
    pub fn new(backend: impl SearchBackend + 'static) -> Self {
        Self::with_timeout(backend, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(backend: impl SearchBackend + 'static, timeout: Duration) -> Self {
        let backend: Box<dyn SearchBackend> = Box::new(backend);
        Self {
            backend: Arc::new(Mutex::new(backend)),
            timeout,
        }
    }

    /// Run `op` with exclusive access to the backend
    ///
    /// On timeout the blocking task keeps running and still holds the lock
    /// until it finishes; the request itself gets [`SearchError::Timeout`].
    pub async fn run<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn SearchBackend) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let task = tokio::task::spawn_blocking(move || {
            let guard = backend.lock();
            op(&**guard)
        });

        match timeout(self.timeout, task).await {
            Ok(joined) => joined.map_err(|e| SearchError::Join(e.to_string()))?,
            Err(_) => {
                tracing::warn!("Search call exceeded {:?}", self.timeout);
                Err(SearchError::Timeout(self.timeout.as_secs()))
            }
        }
    }

    pub async fn info(&self) -> Result<IndexInfo> {
        self.run(|backend| Ok(backend.info())).await
    }
}
