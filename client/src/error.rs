//! Client error types

use crate::session::SessionState;
use shared::{ProtocolError, WireError};
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport could not be established
    #[error("could not connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Read or write failed mid-session, including read timeouts
    #[error("connection lost: {0}")]
    ConnectionLost(#[source] io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("operation not allowed while the session is {0:?}")]
    InvalidState(SessionState),
}

impl ClientError {
    /// Only a rejected local name can be fixed without dropping the connection.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ClientError::Protocol(ProtocolError::InvalidName { .. }))
    }
}

impl From<WireError> for ClientError {
    fn from(e: WireError) -> Self {
        match e {
            WireError::Protocol(e) => ClientError::Protocol(e),
            WireError::Io(e) => ClientError::ConnectionLost(e),
        }
    }
}
