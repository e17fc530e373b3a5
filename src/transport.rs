use std::fmt;
use std::net::SocketAddr;

use crate::error::Result;
use crate::message::Request;

/// Transport protocols a STUN message can travel over.
///
/// Only datagram transport is supported; the retransmission machinery
/// exists precisely because the transport is unreliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportProtocol {
    Udp,
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportProtocol::Udp => write!(f, "UDP"),
        }
    }
}

/// A network address qualified by the transport protocol used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransportAddress {
    address: SocketAddr,
    protocol: TransportProtocol,
}

impl TransportAddress {
    /// Creates a UDP transport address.
    pub fn udp(address: SocketAddr) -> Self {
        Self {
            address,
            protocol: TransportProtocol::Udp,
        }
    }

    /// Returns the socket address.
    pub fn socket_address(&self) -> SocketAddr {
        self.address
    }

    /// Returns the transport protocol.
    pub fn protocol(&self) -> TransportProtocol {
        self.protocol
    }
}

impl fmt::Display for TransportAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.protocol)
    }
}

/// Identifies the local endpoint a transaction was sent from.
///
/// The access layer resolves this descriptor to the socket that should
/// carry retransmissions. Descriptors are cheap to clone and outlive any
/// single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessPoint {
    local_address: TransportAddress,
}

impl AccessPoint {
    /// Creates a descriptor for the given local endpoint.
    pub fn new(local_address: TransportAddress) -> Self {
        Self { local_address }
    }

    /// Returns the local endpoint this descriptor identifies.
    pub fn local_address(&self) -> &TransportAddress {
        &self.local_address
    }
}

impl fmt::Display for AccessPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ap:{}", self.local_address)
    }
}

/// The sending capability the transaction engine requires from the
/// access layer.
///
/// Implementations encode the request and hand the bytes to the socket
/// selected by `access_point`. Sends are expected to be non-blocking or
/// short-bounded; a blocking implementation merely slips the schedule.
/// Safe to call from the transaction worker.
#[async_trait::async_trait]
pub trait StunTransport: Send + Sync + fmt::Debug {
    /// Sends `request` from the endpoint identified by `access_point` to
    /// `destination`.
    async fn send_message(
        &self,
        request: &Request,
        access_point: &AccessPoint,
        destination: &TransportAddress,
    ) -> Result<()>;
}
