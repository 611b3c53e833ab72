use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Liveness flag for the view that started an async call. Once detached,
/// results that arrive afterwards are dropped without touching any state.
#[derive(Debug, Clone, Default)]
pub struct ViewGuard {
    detached: Arc<AtomicBool>,
}

impl ViewGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_attached(&self) -> bool {
        !self.detached.load(Ordering::SeqCst)
    }
}
