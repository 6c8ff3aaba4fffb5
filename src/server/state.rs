use crate::{
    common::data::{CannedResponse, FakeEndpoint, RequestSnapshot},
    server::{history::AuditLog, registry::ExpectationRegistry, resolver::Resolver},
};

/// The shared state behind a server instance. Each collection is guarded separately, a request
/// that is being resolved never blocks the audit log and vice versa.
pub trait StateManager {
    fn endpoints(&self) -> Vec<FakeEndpoint>;
    fn add_endpoint(&self, endpoint: FakeEndpoint);
    fn requests(&self) -> Vec<RequestSnapshot>;
    fn serve(&self, req: RequestSnapshot) -> CannedResponse;
}

pub struct MockingjayStateManager {
    registry: ExpectationRegistry,
    history: AuditLog,
    resolver: Resolver,
}

impl MockingjayStateManager {
    pub fn new(endpoints: Vec<FakeEndpoint>) -> Self {
        Self {
            registry: ExpectationRegistry::new(endpoints),
            history: AuditLog::new(),
            resolver: Resolver::new(),
        }
    }
}

impl Default for MockingjayStateManager {
    fn default() -> Self {
        MockingjayStateManager::new(Vec::new())
    }
}

impl StateManager for MockingjayStateManager {
    fn endpoints(&self) -> Vec<FakeEndpoint> {
        self.registry.list()
    }

    fn add_endpoint(&self, endpoint: FakeEndpoint) {
        self.registry.register(endpoint);
    }

    fn requests(&self) -> Vec<RequestSnapshot> {
        self.history.list()
    }

    fn serve(&self, req: RequestSnapshot) -> CannedResponse {
        self.history.record(req.clone());
        self.registry
            .with_endpoints(|endpoints| self.resolver.resolve(&req, endpoints))
    }
}
