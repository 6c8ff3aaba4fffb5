mod builder;
pub mod handler;
mod history;
pub mod matchers;
pub mod persistence;
mod registry;
mod resolver;
pub mod server;
pub mod state;

pub use builder::MockingjayServerBuilder;
pub use history::AuditLog;
pub use registry::ExpectationRegistry;
pub use resolver::Resolver;

use crate::server::{handler::MockingjayHandler, server::FakeServer, state::MockingjayStateManager};

/// A server wired with the default in-memory state.
pub type MockingjayServer = FakeServer<MockingjayHandler<MockingjayStateManager>>;
