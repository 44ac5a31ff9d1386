//! Integration tests for the WebSocket transport: a real server and a real
//! client, verifying that frames actually cross the network.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    use scrawl_transport::{Connection, Transport, WebSocketTransport};

    async fn connect_client(
        addr: &str,
    ) -> tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    > {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    #[tokio::test]
    async fn test_accept_and_send_receive() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().unwrap().to_string();

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");
        assert!(server_conn.id().into_inner() > 0);

        // Server → client.
        server_conn.send(b"hello from server").await.unwrap();
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"hello from server");

        // Client → server, binary and text both arrive as bytes.
        client_ws
            .send(Message::Binary(b"hello from client".to_vec().into()))
            .await
            .unwrap();
        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, b"hello from client");

        client_ws
            .send(Message::Text("as text".into()))
            .await
            .unwrap();
        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, b"as text");

        server_conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().unwrap().to_string();

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "clean close surfaces as None");
    }

    #[tokio::test]
    async fn test_send_works_while_recv_is_pending() {
        // A connection task parked in recv() must not block broadcasts.
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().unwrap().to_string();

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = std::sync::Arc::new(server_handle.await.unwrap());

        // Park a task in recv(); the client sends nothing yet.
        let reader = {
            let conn = std::sync::Arc::clone(&server_conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        // Sending must still complete.
        server_conn.send(b"broadcast").await.unwrap();
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"broadcast");

        // Unblock and join the reader.
        client_ws
            .send(Message::Binary(b"done".to_vec().into()))
            .await
            .unwrap();
        let received = reader.await.unwrap().unwrap().unwrap();
        assert_eq!(received, b"done");
    }
}
