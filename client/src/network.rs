//! Stream transport to the game server

use crate::error::{ClientError, Result};
use log::{debug, info};
use shared::{decode_snapshot, Snapshot, WireLimits};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Buffered bidirectional connection to one server endpoint.
///
/// Generic over the stream so scripted streams can stand in for a socket.
pub struct Transport<S> {
    stream: S,
    read_timeout: Option<Duration>,
}

/// `host:port` for logs and errors, bracketing IPv6 literals.
pub fn endpoint_label(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

impl Transport<BufReader<TcpStream>> {
    pub async fn connect(host: &str, port: u16, read_timeout: Option<Duration>) -> Result<Self> {
        let endpoint = endpoint_label(host, port);
        info!("Connecting to {}", endpoint);

        let connection_error = |source| ClientError::Connection {
            addr: endpoint.clone(),
            source,
        };
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(connection_error)?;
        stream.set_nodelay(true).map_err(connection_error)?;

        info!("Connected to {}", endpoint);
        Ok(Self::from_stream(BufReader::new(stream), read_timeout))
    }
}

impl<S> Transport<S>
where
    S: AsyncBufRead + AsyncWrite + Unpin,
{
    pub fn from_stream(stream: S, read_timeout: Option<Duration>) -> Self {
        Self {
            stream,
            read_timeout,
        }
    }

    /// Blocks until a complete snapshot has arrived.
    ///
    /// A clean close between snapshots and a read timeout both surface as
    /// [`ClientError::ConnectionLost`].
    pub async fn read_snapshot(&mut self, limits: &WireLimits) -> Result<Snapshot> {
        match self.read_timeout {
            Some(limit) => match timeout(limit, self.read_snapshot_inner(limits)).await {
                Ok(result) => result,
                Err(_) => Err(ClientError::ConnectionLost(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no snapshot within {:?}", limit),
                ))),
            },
            None => self.read_snapshot_inner(limits).await,
        }
    }

    async fn read_snapshot_inner(&mut self, limits: &WireLimits) -> Result<Snapshot> {
        let pending = self
            .stream
            .fill_buf()
            .await
            .map_err(ClientError::ConnectionLost)?;
        if pending.is_empty() {
            return Err(ClientError::ConnectionLost(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            )));
        }

        let snapshot = decode_snapshot(&mut self.stream, limits).await?;
        debug!(
            "Received snapshot: status {}, {} food, {} players",
            snapshot.status,
            snapshot.food.len(),
            snapshot.players.len()
        );
        Ok(snapshot)
    }

    pub async fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream
            .write_all(bytes)
            .await
            .map_err(ClientError::ConnectionLost)?;
        self.stream
            .flush()
            .await
            .map_err(ClientError::ConnectionLost)?;
        Ok(())
    }
}
