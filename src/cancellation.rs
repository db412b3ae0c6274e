// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Cooperative Cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag a caller flips to abort an in-flight projection.
///
/// Clones observe the same flag. The simulator checks it before every shard
/// of trials, so a cancelled run stops within one shard's worth of work.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
