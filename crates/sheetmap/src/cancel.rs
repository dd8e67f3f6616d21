use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::MapError;

/// Cooperative cancellation flag, checked between rows.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub(crate) fn check(token: Option<&CancellationToken>) -> Result<(), MapError> {
        match token {
            Some(t) if t.is_cancelled() => Err(MapError::Cancelled),
            _ => Ok(()),
        }
    }
}
