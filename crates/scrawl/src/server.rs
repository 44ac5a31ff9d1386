//! `ScrawlServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → registry → rooms.
//! The server owns the process-wide registries; each accepted connection
//! runs [`handle_connection`] in its own task.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use scrawl_protocol::JsonCodec;
use scrawl_registry::PlayerRegistry;
use scrawl_room::RoomDirectory;
use scrawl_transport::{Transport, WebSocketTransport};

use crate::handler::{handle_connection, ServerState};
use crate::ScrawlError;

/// Default listen port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Builder for configuring and starting a Scrawl server.
///
/// # Example
///
/// ```rust,no_run
/// use scrawl::ScrawlServer;
///
/// # async fn run() -> Result<(), scrawl::ScrawlError> {
/// let server = ScrawlServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ScrawlServerBuilder {
    bind_addr: String,
}

impl ScrawlServerBuilder {
    /// Creates a builder listening on localhost at [`DEFAULT_PORT`].
    pub fn new() -> Self {
        Self {
            bind_addr: format!("127.0.0.1:{DEFAULT_PORT}"),
        }
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the transport and assembles the server.
    pub async fn build(self) -> Result<ScrawlServer, ScrawlError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let state = Arc::new(ServerState {
            players: Mutex::new(PlayerRegistry::new()),
            rooms: Mutex::new(RoomDirectory::new()),
            codec: JsonCodec,
        });
        Ok(ScrawlServer { transport, state })
    }
}

impl Default for ScrawlServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Scrawl game server.
pub struct ScrawlServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl ScrawlServer {
    /// Creates a new builder.
    pub fn builder() -> ScrawlServerBuilder {
        ScrawlServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), ScrawlError> {
        self.run_with_shutdown(std::future::pending::<()>()).await
    }

    /// Runs the accept loop until `shutdown` resolves, then tears down:
    /// stops accepting, shuts every room actor down (cancelling all
    /// countdowns), and closes the listener.
    pub async fn run_with_shutdown(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ScrawlError> {
        info!("scrawl server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                conn = self.transport.accept() => match conn {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) =
                                handle_connection(conn, state).await
                            {
                                tracing::debug!(
                                    error = %e,
                                    "connection ended with error"
                                );
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "accept failed");
                    }
                },
                _ = &mut shutdown => break,
            }
        }

        info!("shutting down");
        self.state.rooms.lock().await.shutdown_all().await;
        self.transport.shutdown().await?;
        Ok(())
    }
}
