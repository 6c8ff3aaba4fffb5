use crate::{
    common::data::{CannedResponse, FakeEndpoint, RequestSnapshot},
    server::{
        handler::Error::{
            InvalidHeader, RequestBodyDeserializeError, ResponseBodyConversionError,
            ResponseBodySerializeError,
        },
        state::StateManager,
    },
};

use async_trait::async_trait;
use http::{HeaderName, HeaderValue, StatusCode};
use hyper::{body::Bytes, Method, Request, Response};
use path_tree::PathTree;
use serde::{de::DeserializeOwned, Serialize};
use std::{str::FromStr, sync::Arc};
use thiserror::Error;

pub const ENDPOINTS_PATH: &str = "/mj-endpoints";
pub const NEW_ENDPOINT_PATH: &str = "/mj-new-endpoint";
pub const REQUESTS_PATH: &str = "/requests";

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot deserialize request body: {0}")]
    RequestBodyDeserializeError(serde_json::Error),
    #[error("cannot serialize response body: {0}")]
    ResponseBodySerializeError(serde_json::Error),
    #[error("cannot convert response body: {0}")]
    ResponseBodyConversionError(http::Error),
    #[error("invalid status code: {0}")]
    InvalidStatusCode(#[from] http::status::InvalidStatusCode),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

impl Error {
    /// The status code a caller receives when a request fails with this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestBodyDeserializeError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

enum RoutePath {
    Endpoints,
    NewEndpoint,
    Requests,
}

#[async_trait]
pub trait Handler {
    async fn handle(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Error>;
}

/// Routes management requests and serves every other request from the fake endpoints.
pub struct MockingjayHandler<S>
where
    S: StateManager + Send + Sync + 'static,
{
    path_tree: PathTree<RoutePath>,
    state: Arc<S>,
}

#[async_trait]
impl<S> Handler for MockingjayHandler<S>
where
    S: StateManager + Send + Sync + 'static,
{
    async fn handle(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Error> {
        tracing::trace!("Routing incoming request: {:?}", req);

        let method = req.method().clone();
        let path = req.uri().path().to_string();

        // Management routes are exact: a query string makes the request a candidate.
        let route = match req.uri().query() {
            Some(_) => None,
            None => self.path_tree.find(&path),
        };

        if let Some((matched_path, _)) = route {
            match matched_path {
                RoutePath::Endpoints => match method {
                    Method::GET => return self.handle_list_endpoints(),
                    _ => {}
                },
                RoutePath::NewEndpoint => match method {
                    Method::POST => return self.handle_add_endpoint(req),
                    _ => {}
                },
                RoutePath::Requests => match method {
                    Method::GET => return self.handle_list_requests(),
                    _ => {}
                },
            }
        }

        self.catch_all(req)
    }
}

impl<S> MockingjayHandler<S>
where
    S: StateManager + Send + Sync + 'static,
{
    pub fn new(state: Arc<S>) -> Self {
        let mut path_tree: PathTree<RoutePath> = PathTree::new();
        #[allow(unused_must_use)]
        {
            path_tree.insert(ENDPOINTS_PATH, RoutePath::Endpoints);
            path_tree.insert(NEW_ENDPOINT_PATH, RoutePath::NewEndpoint);
            path_tree.insert(REQUESTS_PATH, RoutePath::Requests);
        }

        Self { path_tree, state }
    }

    fn handle_list_endpoints(&self) -> Result<Response<Bytes>, Error> {
        json_response(StatusCode::OK, &self.state.endpoints())
    }

    fn handle_add_endpoint(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Error> {
        let endpoint: FakeEndpoint = parse_json_body(req)?;
        self.state.add_endpoint(endpoint);
        empty_response(StatusCode::CREATED)
    }

    fn handle_list_requests(&self) -> Result<Response<Bytes>, Error> {
        json_response(StatusCode::OK, &self.state.requests())
    }

    fn catch_all(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Error> {
        let snapshot = RequestSnapshot::from(&req);
        let canned_response = self.state.serve(snapshot);

        let response = to_response(&canned_response)?;
        tracing::info!("Responding with {}", canned_response);

        Ok(response)
    }
}

fn to_response(canned_response: &CannedResponse) -> Result<Response<Bytes>, Error> {
    let mut builder = Response::builder().status(StatusCode::from_u16(canned_response.code)?);

    if let Some(headers) = &canned_response.headers {
        for (name, value) in headers {
            let name = HeaderName::from_str(name)
                .map_err(|err| InvalidHeader(format!("invalid header name '{}': {}", name, err)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| InvalidHeader(format!("invalid header value '{}': {}", value, err)))?;
            builder = builder.header(name, value);
        }
    }

    builder
        .body(Bytes::from(canned_response.body.clone()))
        .map_err(ResponseBodyConversionError)
}

fn json_response<T>(status: StatusCode, body: &T) -> Result<Response<Bytes>, Error>
where
    T: Serialize,
{
    let body_bytes = serde_json::to_vec(body).map_err(ResponseBodySerializeError)?;

    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Bytes::from(body_bytes))
        .map_err(ResponseBodyConversionError)
}

fn empty_response(status: StatusCode) -> Result<Response<Bytes>, Error> {
    Response::builder()
        .status(status)
        .body(Bytes::new())
        .map_err(ResponseBodyConversionError)
}

fn parse_json_body<T>(req: Request<Bytes>) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(req.body().as_ref()).map_err(RequestBodyDeserializeError)
}
