use crate::common::data::{RequestPattern, RequestSnapshot};
use std::fmt;

mod body_matcher;
mod header_matcher;
mod method_matcher;
mod uri_matcher;

pub(crate) use body_matcher::BodyMatcher;
pub(crate) use header_matcher::HeaderMatcher;
pub(crate) use method_matcher::MethodMatcher;
pub(crate) use uri_matcher::UriMatcher;

/// Describes one reason why a request does not satisfy a [RequestPattern].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub title: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) => {
                write!(f, ": expected {:?}, got {:?}", expected, actual)
            }
            (Some(expected), None) => write!(f, ": expected {:?}, got nothing", expected),
            _ => Ok(()),
        }
    }
}

/// A single dimension of request matching.
pub trait Matcher {
    fn matches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> bool;
    fn mismatches(&self, req: &RequestSnapshot, pattern: &RequestPattern) -> Vec<Mismatch>;
}

/// All matchers a request must satisfy, in the order their mismatches are reported.
pub fn all() -> Vec<Box<dyn Matcher + Sync + Send>> {
    vec![
        Box::new(MethodMatcher::new()),
        Box::new(UriMatcher::new()),
        Box::new(HeaderMatcher::new()),
        Box::new(BodyMatcher::new()),
    ]
}
