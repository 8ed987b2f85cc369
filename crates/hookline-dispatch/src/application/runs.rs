//! Registry of in-flight backfill runs, for operator cancellation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

type ActiveMap = Arc<Mutex<HashMap<Uuid, CancellationToken>>>;

/// Tracks the cancellation token of every running backfill.
#[derive(Debug, Clone, Default)]
pub struct BackfillRuns {
    active: ActiveMap,
}

impl BackfillRuns {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new run. The run is deregistered when the returned guard
    /// is dropped.
    #[must_use]
    pub fn start(&self) -> ActiveRun {
        let id = Uuid::now_v7();
        let token = CancellationToken::new();
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, token.clone());
        ActiveRun {
            id,
            token,
            active: Arc::clone(&self.active),
        }
    }

    /// Cancels every active run and returns how many were signalled.
    pub fn cancel_all(&self) -> usize {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        for token in active.values() {
            token.cancel();
        }
        active.len()
    }

    /// Number of runs currently registered.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Registration of one running backfill.
#[derive(Debug)]
pub struct ActiveRun {
    id: Uuid,
    token: CancellationToken,
    active: ActiveMap,
}

impl ActiveRun {
    /// The run identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Token checked by the coordinator between submissions.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
