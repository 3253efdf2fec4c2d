//! Load-finished gate polled before editing is enabled

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag flipped once level loading completes.
///
/// The loader keeps one clone and calls [`mark_ready`](Self::mark_ready);
/// the host polls another clone each tick until it reports ready and then
/// enables the editor.
#[derive(Debug, Clone, Default)]
pub struct ReadinessGate {
    ready: Arc<AtomicBool>,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        if !self.ready.swap(true, Ordering::AcqRel) {
            log::info!("Level load finished, editing unlocked");
        }
    }

    /// Back to not-ready, e.g. when a new level starts loading
    pub fn reset(&self) {
        self.ready.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}
