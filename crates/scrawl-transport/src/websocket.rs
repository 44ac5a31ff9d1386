//! WebSocket transport over `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::{Connection, ConnectionId, Transport, TransportError};

type Socket = WebSocketStream<TcpStream>;

/// Allocates a process-unique connection id.
fn next_connection_id() -> ConnectionId {
    static SEQ: AtomicU64 = AtomicU64::new(1);
    ConnectionId::new(SEQ.fetch_add(1, Ordering::Relaxed))
}

/// Listens on a TCP port and upgrades incoming connections to WebSockets.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Binds the listener.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::Bind)?;
        tracing::info!(addr, "listening for websocket connections");
        Ok(Self { listener })
    }

    /// The bound address; with port 0 this is how callers learn the
    /// OS-assigned port.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (tcp, peer) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::Accept)?;
        let socket = tokio_tungstenite::accept_async(tcp)
            .await
            .map_err(TransportError::Handshake)?;

        let id = next_connection_id();
        tracing::debug!(%id, %peer, "websocket client connected");

        let (writer, reader) = socket.split();
        Ok(WebSocketConnection {
            id,
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
        })
    }

    async fn shutdown(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// One upgraded client connection, halved into a guarded writer and
/// reader so the two directions never contend (see the [`Connection`]
/// trait contract). Shared between tasks via `Arc` at the call site.
pub struct WebSocketConnection {
    id: ConnectionId,
    writer: Mutex<SplitSink<Socket, Message>>,
    reader: Mutex<SplitStream<Socket>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let frame = Message::Binary(data.to_vec().into());
        let mut writer = self.writer.lock().await;
        writer.send(frame).await.map_err(TransportError::Send)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut reader = self.reader.lock().await;
        while let Some(frame) = reader.next().await {
            match frame.map_err(TransportError::Recv)? {
                Message::Binary(bytes) => return Ok(Some(bytes.into())),
                Message::Text(text) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Message::Close(_) => return Ok(None),
                // Control frames carry nothing the caller wants.
                _ => {}
            }
        }
        Ok(None)
    }

    async fn close(&self) -> Result<(), Self::Error> {
        let mut writer = self.writer.lock().await;
        writer.close().await.map_err(TransportError::Send)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
