use crate::common::data::{RequestPattern, RequestSnapshot};
use crate::server::matchers::{Matcher, Mismatch};

/// Requires every header declared by the pattern to be present in the request with an equal
/// value. Header names are compared case-insensitively, undeclared request headers are ignored.
pub(crate) struct HeaderMatcher {}

impl HeaderMatcher {
    pub fn new() -> Self {
        Self {}
    }

    fn get_unmatched<'a>(
        &self,
        req: &RequestSnapshot,
        pattern: &'a RequestPattern,
    ) -> Vec<(&'a String, &'a String)> {
        pattern
            .headers
            .as_ref()
            .map_or(Vec::new(), |pattern_headers| {
                pattern_headers
                    .iter()
                    .filter(|(k, v)| req.header(k) != Some(v.as_str()))
                    .collect()
            })
    }
}

impl Matcher for HeaderMatcher {
    fn matches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> bool {
        self.get_unmatched(req, pattern).is_empty()
    }

    fn mismatches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> Vec<Mismatch> {
        self.get_unmatched(req, pattern)
            .into_iter()
            .map(|(k, v)| Mismatch {
                title: format!("Expected header '{}' with value '{}' to be present in the request but it wasn't", k, v),
                expected: Some(format!("{}: {}", k, v)),
                actual: req.header(k).map(|actual| format!("{}: {}", k, actual)),
            })
            .collect()
    }
}
