use crate::common::data::{RequestPattern, RequestSnapshot};
use crate::server::matchers::{Matcher, Mismatch};

/// Compares request bodies byte for byte, unless the pattern uses the wildcard body. An empty
/// pattern body only accepts an empty request body.
pub(crate) struct BodyMatcher {}

impl BodyMatcher {
    pub fn new() -> Self {
        Self {}
    }
}

impl Matcher for BodyMatcher {
    fn matches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> bool {
        pattern.has_wildcard_body() || pattern.body.eq(req.body())
    }

    fn mismatches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> Vec<Mismatch> {
        match self.matches(req, pattern) {
            true => Vec::new(),
            false => vec![Mismatch {
                title: "Request body does not match".to_string(),
                expected: Some(pattern.body.clone()),
                actual: Some(req.body().to_string()),
            }],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn body_must_be_equal() {
        // Arrange
        let matcher = BodyMatcher::new();
        let pattern = RequestPattern::new("POST", "/hello").body("some body");

        // Act & Assert
        assert!(matcher.matches(&RequestSnapshot::new("POST", "/hello", vec![], "some body"), &pattern));
        assert!(!matcher.matches(&RequestSnapshot::new("POST", "/hello", vec![], "some body "), &pattern));
        assert!(!matcher.matches(&RequestSnapshot::new("POST", "/hello", vec![], ""), &pattern));
    }

    #[test]
    fn empty_pattern_body_requires_empty_request_body() {
        // Arrange
        let matcher = BodyMatcher::new();
        let pattern = RequestPattern::new("POST", "/hello");

        // Act & Assert
        assert!(matcher.matches(&RequestSnapshot::new("POST", "/hello", vec![], ""), &pattern));
        assert!(!matcher.matches(&RequestSnapshot::new("POST", "/hello", vec![], "x"), &pattern));
    }

    #[test]
    fn wildcard_accepts_any_body_including_empty() {
        // Arrange
        let matcher = BodyMatcher::new();
        let pattern = RequestPattern::new("POST", "/hello").body("*");

        // Act & Assert
        assert!(matcher.matches(
            &RequestSnapshot::new("POST", "/hello", vec![], "This body isnt what we said but it should match"),
            &pattern
        ));
        assert!(matcher.matches(&RequestSnapshot::new("POST", "/hello", vec![], ""), &pattern));
        assert!(matcher.mismatches(&RequestSnapshot::new("POST", "/hello", vec![], ""), &pattern).is_empty());
    }

    #[test]
    fn body_comparison_is_not_json_aware() {
        // Arrange
        let matcher = BodyMatcher::new();
        let pattern = RequestPattern::new("POST", "/hello").body(r#"{"a":1}"#);

        // Act & Assert
        assert!(!matcher.matches(&RequestSnapshot::new("POST", "/hello", vec![], r#"{ "a": 1 }"#), &pattern));
    }
}
