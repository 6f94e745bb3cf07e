//! Cooperative cancellation for storage calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// Clones share the same flag. The storage checks it at the start of every
/// repository call, so a record already being written completes and the
/// cancellation is observed at the next call.
///
/// Storage opened by the `vocabsync` binary carries a token that is never
/// cancelled; an interrupt ends the process and the open transaction rolls
/// back. Library callers that need to stop an import early create a token,
/// attach it with [`SqliteStorage::with_cancel`](crate::storage::SqliteStorage::with_cancel)
/// and call [`CancelToken::cancel`] from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
