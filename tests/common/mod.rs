#![allow(dead_code)]

use mockingjay::{FakeEndpoint, MockingjayServerBuilder, MockingjayStateManager};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::{sync::oneshot, task::JoinHandle};

/// A server running in the background on an ephemeral port. It shuts down when dropped.
pub struct TestServer {
    pub address: SocketAddr,
    pub state: Arc<MockingjayStateManager>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start(endpoints: Vec<FakeEndpoint>) -> TestServer {
        Self::start_with(MockingjayServerBuilder::new().endpoints(endpoints)).await
    }

    pub async fn start_from_config(path: &Path) -> TestServer {
        Self::start_with(MockingjayServerBuilder::new().config_file(path)).await
    }

    async fn start_with(builder: MockingjayServerBuilder) -> TestServer {
        let state = Arc::new(MockingjayStateManager::default());
        let server = builder
            .port(0)
            .print_access_log(true)
            .build_with_state(state.clone())
            .expect("cannot build server");

        let (addr_sender, addr_receiver) = oneshot::channel();
        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_receiver.await;
            };
            server
                .start_with_signals(Some(addr_sender), shutdown)
                .await
                .expect("server failed");
        });

        let address = addr_receiver.await.expect("cannot get server address");

        TestServer {
            address,
            state,
            shutdown: Some(shutdown_sender),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}
