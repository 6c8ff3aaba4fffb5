use crate::{
    common::data::FakeEndpoint,
    server::{
        handler::MockingjayHandler,
        persistence::read_endpoints,
        server::{FakeServer, FakeServerConfig},
        state::{MockingjayStateManager, StateManager},
        MockingjayServer,
    },
};
use std::{error::Error, path::PathBuf, sync::Arc};

/// The `MockingjayServerBuilder` struct is used to configure the fake HTTP server.
/// It provides methods to set the port, network exposure, access logging and the initial endpoints.
pub struct MockingjayServerBuilder {
    port: Option<u16>,
    expose: Option<bool>,
    print_access_log: Option<bool>,
    endpoints: Vec<FakeEndpoint>,
    config_file: Option<PathBuf>,
}

impl MockingjayServerBuilder {
    /// Creates a new instance of `MockingjayServerBuilder` with default settings.
    pub fn new() -> Self {
        MockingjayServerBuilder {
            port: None,
            expose: None,
            print_access_log: None,
            endpoints: Vec::new(),
            config_file: None,
        }
    }

    /// Sets the port for the server. Port 0 picks a free port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the port for the server as an optional value.
    pub fn port_option(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Sets whether the server should listen on all interfaces instead of loopback only.
    pub fn expose(mut self, expose: bool) -> Self {
        self.expose = Some(expose);
        self
    }

    /// Sets whether the server should be exposed to external access as an optional value.
    pub fn expose_option(mut self, expose: Option<bool>) -> Self {
        self.expose = expose;
        self
    }

    /// Sets whether to log one line per served request.
    pub fn print_access_log(mut self, enabled: bool) -> Self {
        self.print_access_log = Some(enabled);
        self
    }

    /// Sets whether to print access logs as an optional value.
    pub fn print_access_log_option(mut self, enabled: Option<bool>) -> Self {
        self.print_access_log = enabled;
        self
    }

    /// Sets the endpoints the server starts with. They take precedence over endpoints read from
    /// a config file and over endpoints registered at runtime.
    pub fn endpoints(mut self, endpoints: Vec<FakeEndpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets a YAML/JSON file, or a directory of such files, to read endpoints from.
    pub fn config_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Sets the endpoint config file as an optional value.
    pub fn config_file_option<P: Into<PathBuf>>(mut self, path: Option<P>) -> Self {
        self.config_file = path.map(|p| p.into());
        self
    }

    /// Builds the server with the current settings.
    ///
    /// # Returns
    /// A `MockingjayServer` instance or an error if the endpoint config cannot be loaded.
    pub fn build(self) -> Result<MockingjayServer, Box<dyn Error>> {
        self.build_with_state(Arc::new(MockingjayStateManager::default()))
    }

    /// Builds the server with the current settings on top of the provided state. Keeping a
    /// reference to the state allows inspecting registered endpoints and recorded requests.
    pub fn build_with_state<S>(
        self,
        state: Arc<S>,
    ) -> Result<FakeServer<MockingjayHandler<S>>, Box<dyn Error>>
    where
        S: StateManager + Send + Sync + 'static,
    {
        for endpoint in self.endpoints {
            state.add_endpoint(endpoint);
        }

        if let Some(path) = self.config_file {
            for endpoint in read_endpoints(path)? {
                state.add_endpoint(endpoint);
            }
        }

        let handler = MockingjayHandler::new(state);

        Ok(FakeServer::new(
            handler,
            FakeServerConfig {
                port: self.port,
                expose: self.expose.unwrap_or(false),
                print_access_log: self.print_access_log.unwrap_or(false),
            },
        ))
    }
}

impl Default for MockingjayServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
