use crate::common::data::{RequestPattern, RequestSnapshot};
use crate::server::matchers::{Matcher, Mismatch};

/// Compares HTTP methods exactly. No case normalization takes place.
pub(crate) struct MethodMatcher {}

impl MethodMatcher {
    pub fn new() -> Self {
        Self {}
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> bool {
        pattern.method.eq(req.method())
    }

    fn mismatches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> Vec<Mismatch> {
        match self.matches(req, pattern) {
            true => Vec::new(),
            false => vec![Mismatch {
                title: "Request method does not match".to_string(),
                expected: Some(pattern.method.clone()),
                actual: Some(req.method().to_string()),
            }],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn method_must_be_equal() {
        // Arrange
        let matcher = MethodMatcher::new();
        let pattern = RequestPattern::new("GET", "/hello");

        // Act & Assert
        assert!(matcher.matches(&RequestSnapshot::new("GET", "/hello", vec![], ""), &pattern));
        assert!(!matcher.matches(&RequestSnapshot::new("POST", "/hello", vec![], ""), &pattern));
    }

    #[test]
    fn method_comparison_is_case_sensitive() {
        // Arrange
        let matcher = MethodMatcher::new();
        let pattern = RequestPattern::new("GET", "/hello");
        let req = RequestSnapshot::new("get", "/hello", vec![], "");

        // Act
        let mismatches = matcher.mismatches(&req, &pattern);

        // Assert
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].expected.as_deref(), Some("GET"));
        assert_eq!(mismatches[0].actual.as_deref(), Some("get"));
    }
}
