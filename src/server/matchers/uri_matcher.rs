use crate::common::data::{RequestPattern, RequestSnapshot};
use crate::server::matchers::{Matcher, Mismatch};

/// Compares the path and query of a request against the pattern URI. Both sides are compared
/// as plain strings, percent-encoded sequences are never decoded here.
pub(crate) struct UriMatcher {}

impl UriMatcher {
    pub fn new() -> Self {
        Self {}
    }
}

impl Matcher for UriMatcher {
    fn matches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> bool {
        pattern.uri.eq(req.uri())
    }

    fn mismatches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> Vec<Mismatch> {
        match self.matches(req, pattern) {
            true => Vec::new(),
            false => vec![Mismatch {
                title: "Request URI does not match".to_string(),
                expected: Some(pattern.uri.clone()),
                actual: Some(req.uri().to_string()),
            }],
        }
    }
}
