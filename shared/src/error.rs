//! Codec error types

use thiserror::Error;

/// Violations of the wire format.
///
/// None of these can be recovered from mid-stream: the protocol has no message
/// envelope or checksum to resynchronize on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Stream ended before a fixed-size field was complete
    #[error("stream ended while reading {field}")]
    Truncated { field: &'static str },

    /// Name ran past the safety budget without a terminator
    #[error("name exceeds {budget} octets without a terminator")]
    UnterminatedName { budget: usize },

    /// Intent line ran past its length cap without a terminator
    #[error("intent line exceeds {budget} octets without a terminator")]
    OverlongIntent { budget: usize },

    /// Name rejected before encoding
    #[error("invalid name: {reason}")]
    InvalidName { reason: &'static str },

    #[error("{count} {kind} entities do not fit in a one-octet count")]
    TooManyEntities { kind: &'static str, count: usize },

    #[error("unknown direction code {0:#04x}")]
    UnknownDirection(u8),

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Anything that can go wrong while decoding from a byte source.
#[derive(Debug, Error)]
pub enum WireError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for ProtocolError {
    fn from(e: bincode::Error) -> Self {
        ProtocolError::Malformed(e.to_string())
    }
}
