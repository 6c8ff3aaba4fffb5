use futures_util::FutureExt;
use http::{Request, StatusCode};
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::{
    body::{Bytes, Incoming},
    service::service_fn,
    Response,
};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto::Builder as ConnectionBuilder,
};
use std::{
    future::{pending, Future},
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};
use thiserror::Error;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
};

use crate::server::{
    handler::{self, Handler},
    server::Error::{
        AddressPublishError, BindError, BodyReadError, ConnectionError, HandlerError,
        LocalAddressError,
    },
};

type ServiceBody = BoxBody<Bytes, hyper::Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot bind to {0}: {1}")]
    BindError(SocketAddr, std::io::Error),
    #[error("cannot determine the bound address: {0}")]
    LocalAddressError(std::io::Error),
    #[error("cannot publish bound address {0}, the receiver is gone")]
    AddressPublishError(SocketAddr),
    #[error("cannot read request body: {0}")]
    BodyReadError(hyper::Error),
    #[error("cannot build response: {0}")]
    ResponseBuildError(#[from] http::Error),
    #[error("cannot process request: {0}")]
    HandlerError(#[from] handler::Error),
    #[error("connection error: {0}")]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),
}

/// Network settings of a [FakeServer].
pub struct FakeServerConfig {
    /// `None` or `Some(0)` lets the OS pick a free port.
    pub port: Option<u16>,
    /// Listen on all interfaces instead of loopback only.
    pub expose: bool,
    pub print_access_log: bool,
}

impl FakeServerConfig {
    fn socket_addr(&self) -> SocketAddr {
        let ip = if self.expose {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };
        SocketAddr::new(ip, self.port.unwrap_or(0))
    }
}

/// Accepts TCP connections and answers every HTTP request on them with the given handler.
pub struct FakeServer<H>
where
    H: Handler + Send + Sync + 'static,
{
    handler: H,
    config: FakeServerConfig,
}

impl<H> FakeServer<H>
where
    H: Handler + Send + Sync + 'static,
{
    pub fn new(handler: H, config: FakeServerConfig) -> Self {
        FakeServer { handler, config }
    }

    /// Serves requests until the process ends.
    pub async fn start(self) -> Result<(), Error> {
        self.start_with_signals(None, pending()).await
    }

    /// Serves requests until `shutdown` resolves. Once the listener is bound, its address is sent
    /// through `address_sender`, which lets callers use port 0 and learn the actual port.
    pub async fn start_with_signals<F>(
        self,
        address_sender: Option<oneshot::Sender<SocketAddr>>,
        shutdown: F,
    ) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let requested = self.config.socket_addr();
        let listener = TcpListener::bind(requested)
            .await
            .map_err(|err| BindError(requested, err))?;
        let bound = listener.local_addr().map_err(LocalAddressError)?;

        if let Some(sender) = address_sender {
            sender.send(bound).map_err(AddressPublishError)?;
        }

        tracing::info!("Fake server listening on {}", bound);
        self.accept_connections(listener, shutdown).await;
        Ok(())
    }

    async fn accept_connections<F>(self, listener: TcpListener, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let shutdown = shutdown.shared();
        let server = Arc::new(self);

        loop {
            tokio::select! {
                _ = shutdown.clone() => {
                    tracing::info!("Shutdown requested, no longer accepting connections");
                    return;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tokio::spawn(server.clone().serve_connection(stream, peer));
                    }
                    Err(err) => tracing::error!("cannot accept connection: {}", err),
                },
            }
        }
    }

    async fn serve_connection(self: Arc<Self>, stream: TcpStream, peer: SocketAddr) {
        tracing::trace!("Accepted connection from {}", peer);

        let result = ConnectionBuilder::new(TokioExecutor::new())
            .serve_connection(
                TokioIo::new(stream),
                service_fn(|req| self.clone().respond(req)),
            )
            .await
            .map_err(ConnectionError);

        if let Err(err) = result {
            tracing::error!("{} (peer {})", err, peer);
        }
    }

    async fn respond(self: Arc<Self>, req: Request<Incoming>) -> Result<Response<ServiceBody>, Error> {
        let summary = format!("{} {}", req.method(), req.uri());
        tracing::trace!("Received {}", summary);

        let response = match read_body(req).await {
            Ok(req) => match self.handler.handle(req).await {
                Ok(response) => Ok(response.map(full)),
                Err(err) => plain_text(err.status_code(), HandlerError(err)),
            },
            Err(err) => plain_text(StatusCode::BAD_REQUEST, BodyReadError(err)),
        };

        if self.config.print_access_log {
            if let Ok(response) = &response {
                tracing::info!("{} -> {}", summary, response.status());
            }
        }

        response
    }
}

async fn read_body(req: Request<Incoming>) -> Result<Request<Bytes>, hyper::Error> {
    let (parts, body) = req.into_parts();
    let bytes = body.collect().await?.to_bytes();
    Ok(Request::from_parts(parts, bytes))
}

fn full(bytes: Bytes) -> ServiceBody {
    Full::new(bytes).map_err(|never| match never {}).boxed()
}

/// Answers with the error's text. Client errors are logged as warnings, server errors as errors.
fn plain_text(status: StatusCode, err: Error) -> Result<Response<ServiceBody>, Error> {
    if status.is_server_error() {
        tracing::error!("{}", err);
    } else {
        tracing::warn!("{}", err);
    }

    Ok(Response::builder()
        .status(status)
        .header("content-type", "text/plain; charset=utf-8")
        .body(full(Bytes::from(err.to_string())))?)
}
