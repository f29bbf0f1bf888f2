//! A one-shot, monotonic cancellation signal shared between a caller and
//! the component it configures.
//!
//! Modeled as "a shared observable state word with a one-shot transition"
//! (see the design note on abort signals): an atomic flag plus a tag
//! distinguishing why it fired.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AbortOrigin;

#[derive(Debug, Default)]
struct Inner {
    fired: AtomicBool,
    origin: AtomicBool, // false = Signal, true = Timeout
}

/// A cancellation signal. Cloning shares the same underlying state; firing
/// it from any clone is observable from every other clone.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    inner: Arc<Inner>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal as a plain abort. Idempotent.
    pub fn abort(&self) {
        self.inner.fired.store(true, Ordering::SeqCst);
    }

    /// Fire the signal tagged as a timeout. Idempotent.
    pub fn timeout(&self) {
        self.inner.origin.store(true, Ordering::SeqCst);
        self.inner.fired.store(true, Ordering::SeqCst);
    }

    /// True once the signal has fired, by any means.
    pub fn is_aborted(&self) -> bool {
        self.inner.fired.load(Ordering::SeqCst)
    }

    /// Returns the origin tag if the signal has fired, otherwise `None`.
    pub fn origin(&self) -> Option<AbortOrigin> {
        if !self.is_aborted() {
            return None;
        }
        if self.inner.origin.load(Ordering::SeqCst) {
            Some(AbortOrigin::Timeout)
        } else {
            Some(AbortOrigin::Signal)
        }
    }
}
