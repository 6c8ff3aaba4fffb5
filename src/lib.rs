//! A configurable fake HTTP server for tests.
//!
//! The server is configured with a list of [FakeEndpoint]s. Each one pairs an expected request
//! with a canned response. Every incoming request is recorded and matched against the endpoints
//! in registration order. The first endpoint whose pattern matches wins. If nothing matches, the
//! server replies with `404 Not Found` and a plain text body describing the request and why each
//! endpoint rejected it.
//!
//! A request matches a [RequestPattern] if all of the following hold:
//! - the method is equal (case-sensitive),
//! - the URI (path and query, as sent by the client) is equal,
//! - every header declared by the pattern is present with an equal value (names compared
//!   case-insensitively, additional request headers are ignored),
//! - the body is equal, or the pattern body is the wildcard `*`.
//!
//! # Management interface
//! - `GET /mj-endpoints` lists the configured endpoints as JSON.
//! - `POST /mj-new-endpoint` registers a new endpoint from a JSON body (`201 Created`, or
//!   `400 Bad Request` if the body cannot be decoded).
//! - `GET /requests` lists all recorded requests as JSON in arrival order.
//!
//! # Example
//! ```no_run
//! use mockingjay::{CannedResponse, FakeEndpoint, MockingjayServerBuilder, RequestPattern};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let server = MockingjayServerBuilder::new()
//!     .port(9090)
//!     .endpoints(vec![FakeEndpoint::new(
//!         "greeting",
//!         RequestPattern::new("GET", "/hello").header("Accept", "text/plain"),
//!         CannedResponse::new(200, "world"),
//!     )])
//!     .build()?;
//!
//! server.start().await?;
//! # Ok(())
//! # }
//! ```
mod common;
pub mod server;

pub use common::data::{CannedResponse, FakeEndpoint, RequestPattern, RequestSnapshot, WILDCARD_BODY};
pub use server::{
    handler::{Handler, MockingjayHandler},
    server::FakeServer,
    state::{MockingjayStateManager, StateManager},
    MockingjayServer, MockingjayServerBuilder,
};
