//! Readiness signaling between operators and the external driver.
//!
//! Operators never block. A stalled producer returns
//! `Readiness::Pending(signal)` from `is_ready` and calls
//! `WakeSignal::notify` once it can make progress again; only the driving
//! loop waits on the signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cloneable wake token shared between a producer and whoever polls it.
#[derive(Debug, Clone, Default)]
pub struct WakeSignal {
    notified: Arc<AtomicBool>,
}

impl WakeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self) {
        self.notified.store(true, Ordering::Release);
    }

    pub fn is_notified(&self) -> bool {
        self.notified.load(Ordering::Acquire)
    }

    /// Park the calling thread until `notify` is observed, re-checking
    /// every `park` interval. Driver-side only.
    pub fn wait(&self, park: Duration) {
        while !self.is_notified() {
            std::thread::park_timeout(park);
        }
    }
}

/// Poll-style readiness of an operator.
#[derive(Debug, Clone)]
pub enum Readiness {
    Ready,
    Pending(WakeSignal),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_is_visible_through_clones() {
        let signal = WakeSignal::new();
        let handle = signal.clone();
        assert!(!handle.is_notified());
        signal.notify();
        assert!(handle.is_notified());
    }
}
