use bytes::Bytes;
use http::{HeaderMap, Request};
use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeMap, fmt};

/// The pattern body that accepts any request body, including an empty one.
pub const WILDCARD_BODY: &str = "*";

/// A configured fake endpoint: an expected request paired with the response to serve for it.
///
/// The name is a human readable label only. `cdc_disabled` is not evaluated by this server, it is
/// carried along for tooling that verifies the configured endpoints against a real service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FakeEndpoint {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    #[serde(rename = "CDCDisabled", alias = "cdcdisabled", alias = "cdcDisabled", default)]
    pub cdc_disabled: bool,
    #[serde(rename = "Request", alias = "request")]
    pub request: RequestPattern,
    #[serde(rename = "Response", alias = "response")]
    pub response: CannedResponse,
}

impl FakeEndpoint {
    pub fn new<S: Into<String>>(name: S, request: RequestPattern, response: CannedResponse) -> Self {
        Self {
            name: name.into(),
            cdc_disabled: false,
            request,
            response,
        }
    }
}

/// The expectation side of a [FakeEndpoint].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestPattern {
    #[serde(rename = "URI", alias = "uri")]
    pub uri: String,
    #[serde(rename = "Method", alias = "method")]
    pub method: String,
    #[serde(rename = "Headers", alias = "headers", default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(rename = "Body", alias = "body", default)]
    pub body: String,
}

impl RequestPattern {
    pub fn new<M: Into<String>, U: Into<String>>(method: M, uri: U) -> Self {
        Self {
            uri: uri.into(),
            method: method.into(),
            headers: None,
            body: String::new(),
        }
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn body<B: Into<String>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    pub fn has_wildcard_body(&self) -> bool {
        self.body == WILDCARD_BODY
    }
}

/// The response served verbatim when a [RequestPattern] matches.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CannedResponse {
    #[serde(rename = "Code", alias = "code")]
    pub code: u16,
    #[serde(rename = "Body", alias = "body", default)]
    pub body: String,
    #[serde(rename = "Headers", alias = "headers", default)]
    pub headers: Option<BTreeMap<String, String>>,
}

impl CannedResponse {
    pub fn new<B: Into<String>>(code: u16, body: B) -> Self {
        Self {
            code,
            body: body.into(),
            headers: None,
        }
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

impl fmt::Display for CannedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(headers) = &self.headers {
            for (name, value) in headers {
                write!(f, " {}={}", name, value)?;
            }
        }
        write!(f, " body={:?}", self.body)
    }
}

/// An immutable capture of one incoming request.
///
/// Header names are stored lower-cased so that lookups by name are case-insensitive. Values of
/// repeated headers are joined with `", "`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    #[serde(rename = "URI")]
    uri: String,
    #[serde(rename = "Method")]
    method: String,
    #[serde(rename = "Headers")]
    headers: BTreeMap<String, String>,
    #[serde(rename = "Body")]
    body: String,
}

impl RequestSnapshot {
    pub fn new<M, U, B>(method: M, uri: U, headers: Vec<(String, String)>, body: B) -> Self
    where
        M: Into<String>,
        U: Into<String>,
        B: Into<String>,
    {
        let mut header_map: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            header_map
                .entry(name.to_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        Self {
            uri: uri.into(),
            method: method.into(),
            headers: header_map,
            body: body.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Looks up a header value by name, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Wire form of a [RequestSnapshot]. Decoding goes through [RequestSnapshot::new] so that
/// header names are normalized the same way as for live requests.
#[derive(Deserialize)]
struct SnapshotFields {
    #[serde(rename = "URI")]
    uri: String,
    #[serde(rename = "Method")]
    method: String,
    #[serde(rename = "Headers", default)]
    headers: BTreeMap<String, String>,
    #[serde(rename = "Body", default)]
    body: String,
}

impl<'de> Deserialize<'de> for RequestSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = SnapshotFields::deserialize(deserializer)?;
        Ok(RequestSnapshot::new(
            fields.method,
            fields.uri,
            fields.headers.into_iter().collect(),
            fields.body,
        ))
    }
}

impl From<&Request<Bytes>> for RequestSnapshot {
    fn from(req: &Request<Bytes>) -> Self {
        // The request target is kept as received. Percent-encoded sequences are neither decoded
        // nor normalized so that patterns can be written exactly as clients send them.
        let uri = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        RequestSnapshot::new(
            req.method().as_str(),
            uri,
            headers_to_vec(req.headers()),
            String::from_utf8_lossy(req.body()).into_owned(),
        )
    }
}

fn headers_to_vec(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fake_endpoint_uses_management_field_names() {
        // Arrange
        let endpoint = FakeEndpoint::new(
            "Fake 1",
            RequestPattern::new("GET", "/hello").header("Content-Type", "application/json"),
            CannedResponse::new(201, "world"),
        );

        // Act
        let value = serde_json::to_value(&endpoint).unwrap();

        // Assert
        assert_eq!(value["Name"], "Fake 1");
        assert_eq!(value["CDCDisabled"], false);
        assert_eq!(value["Request"]["URI"], "/hello");
        assert_eq!(value["Request"]["Method"], "GET");
        assert_eq!(value["Request"]["Headers"]["Content-Type"], "application/json");
        assert_eq!(value["Request"]["Body"], "");
        assert_eq!(value["Response"]["Code"], 201);
        assert_eq!(value["Response"]["Body"], "world");
        assert!(value["Response"]["Headers"].is_null());
    }

    #[test]
    fn fake_endpoint_requires_uri_and_method() {
        // Arrange
        let json = r#"{"Name":"x","Request":{"Method":"GET"},"Response":{"Code":200}}"#;

        // Act
        let result = serde_json::from_str::<FakeEndpoint>(json);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn fake_endpoint_defaults_optional_fields() {
        // Arrange
        let json = r#"{"Request":{"URI":"/foo","Method":"GET"},"Response":{"Code":200}}"#;

        // Act
        let endpoint: FakeEndpoint = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(endpoint.name, "");
        assert!(!endpoint.cdc_disabled);
        assert_eq!(endpoint.request.headers, None);
        assert_eq!(endpoint.request.body, "");
        assert_eq!(endpoint.response.body, "");
    }

    #[test]
    fn snapshot_lower_cases_and_joins_headers() {
        // Arrange
        let headers = vec![
            ("Content-TYPE".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "text/plain".to_string()),
            ("accept".to_string(), "text/html".to_string()),
        ];

        // Act
        let snapshot = RequestSnapshot::new("GET", "/hello", headers, "");

        // Assert
        assert_eq!(snapshot.header("content-type"), Some("application/json"));
        assert_eq!(snapshot.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(snapshot.header("Accept"), Some("text/plain, text/html"));
        assert_eq!(snapshot.header("X-Missing"), None);
    }

    #[test]
    fn decoded_snapshot_normalizes_header_names() {
        // Arrange
        let json = r#"{"URI":"/a","Method":"GET","Headers":{"Content-Type":"application/json"},"Body":""}"#;

        // Act
        let snapshot: RequestSnapshot = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(snapshot.header("content-type"), Some("application/json"));
        assert_eq!(snapshot.headers().keys().collect::<Vec<_>>(), vec!["content-type"]);
    }

    #[test]
    fn snapshot_keeps_request_target_as_received() {
        // Arrange
        let req = Request::builder()
            .method("POST")
            .uri("/document/10.1007%2Fs00414-006-0114-x?q=a%20b")
            .header("X-Trace", "abc")
            .body(Bytes::from("some body"))
            .unwrap();

        // Act
        let snapshot = RequestSnapshot::from(&req);

        // Assert
        assert_eq!(snapshot.method(), "POST");
        assert_eq!(snapshot.uri(), "/document/10.1007%2Fs00414-006-0114-x?q=a%20b");
        assert_eq!(snapshot.header("x-trace"), Some("abc"));
        assert_eq!(snapshot.body(), "some body");
    }
}
