use crate::common::data::RequestSnapshot;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Append-only record of every request that was matched against the registry, in arrival order.
///
/// The log is unbounded. It lives as long as the server that owns it.
#[derive(Default)]
pub struct AuditLog {
    requests: Mutex<Vec<RequestSnapshot>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, snapshot: RequestSnapshot) {
        let mut requests = self.lock();
        requests.push(snapshot);
        tracing::trace!("Recorded request #{}", requests.len());
    }

    pub fn list(&self) -> Vec<RequestSnapshot> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RequestSnapshot>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
