use crate::config::toml_config::ListenerConfig;
use crate::core::session::Session;
use crate::utils::error::Result;
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinSet;

/// TCP front end: every connection gets its own [`Session`].
pub struct Listener {
    inner: TcpListener,
    config: ListenerConfig,
}

impl Listener {
    pub async fn bind(config: &ListenerConfig) -> Result<Self> {
        let inner = TcpListener::bind(config.bind_address()).await?;
        tracing::info!("listening on {}", inner.local_addr()?);
        Ok(Self {
            inner,
            config: config.clone(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.inner.local_addr()?)
    }

    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` resolves, then aborts the
    /// connections still open and waits for their tasks to finish.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                accepted = self.inner.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            tracing::warn!("accept failed: {}", e);
                            continue;
                        }
                    };
                    tracing::info!("connection from {}", peer);

                    let config = self.config.clone();
                    connections.spawn(async move {
                        match handle_connection(stream, &config).await {
                            Ok(()) => tracing::info!("connection from {} closed", peer),
                            Err(e) => tracing::warn!("connection from {} aborted: {}", peer, e),
                        }
                    });
                }
            }
        }

        tracing::info!(
            "listener shutting down, closing {} open connection(s)",
            connections.len()
        );
        connections.shutdown().await;
        Ok(())
    }
}

/// Reads until EOF, writing one reply per completed action frame.
pub async fn handle_connection<S>(mut stream: S, config: &ListenerConfig) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = Session::new(&config.action_terminator, config.max_pending_bytes);
    let mut chunk = vec![0u8; config.read_buffer_bytes];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }

        let replies = session.push(&chunk[..n])?;
        for reply in &replies {
            stream.write_all(reply.as_bytes()).await?;
        }
        if !replies.is_empty() {
            stream.flush().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ThoughtError;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_handle_connection_replies_on_action_frame() {
        let stream = Builder::new()
            .read(br#"{"thought": [9, "-", 4, "=", "@"]}"#)
            .read(br#"{"action": 0}"#)
            .write(b"5")
            .build();

        handle_connection(stream, &ListenerConfig::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_handle_connection_replies_per_frame() {
        let stream = Builder::new()
            .read(br#"[1, "+", 2 {"action": 0}[3, "+", 4 {"action": 0}"#)
            .write(b"3")
            .write(b"7")
            .build();

        handle_connection(stream, &ListenerConfig::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_handle_connection_silent_without_action() {
        let stream = Builder::new().read(b"[1, +, 2").build();

        handle_connection(stream, &ListenerConfig::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_handle_connection_aborts_over_limit() {
        let config = ListenerConfig {
            read_buffer_bytes: 4,
            max_pending_bytes: 4,
            ..ListenerConfig::default()
        };
        let stream = Builder::new().read(b"abcd").read(b"e").build();

        let err = handle_connection(stream, &config).await.unwrap_err();
        assert!(matches!(err, ThoughtError::ProcessingError { .. }));
    }
}
