use crate::{
    common::data::{CannedResponse, FakeEndpoint, RequestPattern, RequestSnapshot},
    server::matchers::{self, Matcher, Mismatch},
};
use std::fmt::Write;

/// Resolves requests against an ordered list of fake endpoints. The earliest registered endpoint
/// whose pattern matches wins, there is no ranking by specificity.
pub struct Resolver {
    matchers: Vec<Box<dyn Matcher + Sync + Send>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            matchers: matchers::all(),
        }
    }

    /// Returns true if the request satisfies every dimension of the pattern.
    pub fn matches(&self, pattern: &RequestPattern, req: &RequestSnapshot) -> bool {
        tracing::trace!("Matching {} {} against {} {}", req.method(), req.uri(), pattern.method, pattern.uri);
        self.matchers.iter().all(|m| m.matches(req, pattern))
    }

    pub fn mismatches(&self, pattern: &RequestPattern, req: &RequestSnapshot) -> Vec<Mismatch> {
        self.matchers
            .iter()
            .flat_map(|m| m.mismatches(req, pattern))
            .collect()
    }

    /// Returns the canned response of the first matching endpoint, or a 404 diagnostic response
    /// describing the request and why each endpoint rejected it.
    pub fn resolve(&self, req: &RequestSnapshot, endpoints: &[FakeEndpoint]) -> CannedResponse {
        let found = endpoints
            .iter()
            .enumerate()
            .find(|(_, endpoint)| self.matches(&endpoint.request, req));

        if let Some((idx, endpoint)) = found {
            tracing::debug!(
                "Matched endpoint #{} '{}' to request {} {}",
                idx,
                endpoint.name,
                req.method(),
                req.uri()
            );
            return endpoint.response.clone();
        }

        tracing::debug!(
            "Could not match any endpoint to the following request: {:#?}",
            req
        );

        self.not_found(req, endpoints)
    }

    fn not_found(&self, req: &RequestSnapshot, endpoints: &[FakeEndpoint]) -> CannedResponse {
        CannedResponse::new(404, self.diagnostic(req, endpoints))
            .header("Content-Type", "text/plain; charset=utf-8")
    }

    fn diagnostic(&self, req: &RequestSnapshot, endpoints: &[FakeEndpoint]) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "No fake endpoint matched the request.");
        let _ = writeln!(out);
        let _ = writeln!(out, "Method: {}", req.method());
        let _ = writeln!(out, "URI: {}", req.uri());
        let _ = writeln!(out, "Headers (names lower-cased):");
        for (name, value) in req.headers() {
            let _ = writeln!(out, "  {}: {}", name, value);
        }
        let _ = writeln!(out, "Body:");
        let _ = writeln!(out, "{}", req.body());
        let _ = writeln!(out);

        if endpoints.is_empty() {
            let _ = writeln!(out, "No fake endpoints are configured.");
            return out;
        }

        let _ = writeln!(out, "Configured endpoints ({}):", endpoints.len());
        for (idx, endpoint) in endpoints.iter().enumerate() {
            let _ = writeln!(
                out,
                "  #{} '{}' ({} {})",
                idx, endpoint.name, endpoint.request.method, endpoint.request.uri
            );
            for mismatch in self.mismatches(&endpoint.request, req) {
                let _ = writeln!(out, "    - {}", mismatch);
            }
        }

        out
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
