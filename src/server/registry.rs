use crate::common::data::FakeEndpoint;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The ordered, append-only list of configured fake endpoints.
pub struct ExpectationRegistry {
    endpoints: Mutex<Vec<FakeEndpoint>>,
}

impl ExpectationRegistry {
    pub fn new(endpoints: Vec<FakeEndpoint>) -> Self {
        Self {
            endpoints: Mutex::new(endpoints),
        }
    }

    /// Returns a snapshot of all endpoints in registration order.
    pub fn list(&self) -> Vec<FakeEndpoint> {
        self.lock().clone()
    }

    /// Appends an endpoint. Identical endpoints are not de-duplicated.
    pub fn register(&self, endpoint: FakeEndpoint) {
        let mut endpoints = self.lock();
        tracing::debug!(
            "Registering endpoint '{}' ({} {}) at position {}",
            endpoint.name,
            endpoint.request.method,
            endpoint.request.uri,
            endpoints.len()
        );
        endpoints.push(endpoint);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Runs `f` against the current endpoints while holding the registry lock, so that
    /// concurrent registrations cannot interleave with the read.
    pub(crate) fn with_endpoints<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&[FakeEndpoint]) -> T,
    {
        f(&self.lock())
    }

    // An append either completed or never happened, so a poisoned lock still guards
    // consistent data.
    fn lock(&self) -> MutexGuard<'_, Vec<FakeEndpoint>> {
        self.endpoints.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ExpectationRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::data::{CannedResponse, RequestPattern};
    use std::{sync::Arc, thread};

    fn endpoint(name: &str) -> FakeEndpoint {
        FakeEndpoint::new(
            name,
            RequestPattern::new("GET", "/hello"),
            CannedResponse::new(200, name),
        )
    }

    #[test]
    fn register_appends_in_order() {
        // Arrange
        let registry = ExpectationRegistry::new(vec![endpoint("first")]);

        // Act
        registry.register(endpoint("second"));
        registry.register(endpoint("second"));

        // Assert
        let names: Vec<String> = registry.list().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["first", "second", "second"]);
    }

    #[test]
    fn concurrent_registrations_are_not_lost() {
        // Arrange
        let registry = Arc::new(ExpectationRegistry::default());

        // Act
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for j in 0..25 {
                        registry.register(endpoint(&format!("{}-{}", i, j)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Assert
        assert_eq!(registry.len(), 200);
    }
}
