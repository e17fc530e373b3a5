use std::io;
use thiserror::Error;

use crate::transport::TransportAddress;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving STUN client transactions
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be serialized by the access layer
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// Sending a datagram failed
    #[error("error sending request to {0}: {1}")]
    SendFailed(TransportAddress, #[source] io::Error),

    /// The access layer has been shut down
    #[error("transport is closed")]
    TransportClosed,

    /// `start` was called on a transaction that is already running
    #[error("transaction already started")]
    AlreadyStarted,

    /// The entropy source could not produce a transaction identifier
    #[error("entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
