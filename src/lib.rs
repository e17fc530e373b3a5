//! # STUN client transaction layer
//!
//! This crate implements the client side of a STUN transaction layer as
//! used by an ICE agent: given a request that must reach a server or
//! peer over an unreliable datagram transport, it drives the timed
//! retransmission schedule, matches inbound responses to in-flight
//! transactions by their 96-bit identifier, and reports exactly one
//! outcome (response or timeout) to an application-supplied collector.
//!
//! ## Responsibilities
//!
//! 1. **Reliability**: retransmit each request on a doubling-to-a-cap
//!    schedule until it is answered or the schedule is exhausted.
//! 2. **Matching**: multiplex inbound responses onto live transactions
//!    by transaction identifier.
//! 3. **Lifecycle**: guarantee a single terminal notification per
//!    transaction under concurrent timeout, response arrival and
//!    cancellation, and release every finished transaction from the
//!    registry.
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------+
//! |   Application / ICE agent           |
//! |   (candidate harvesting, checks)    |
//! +-------------------------------------+
//!        | submit / cancel        ^ on_response / on_timeout
//!        v                        |
//! +-------------------------------------+
//! |   Transaction layer (this crate)    |
//! |   TransactionManager                |
//! |   StunClientTransaction workers     |
//! +-------------------------------------+
//!        | send_message           ^ deliver(id, event)
//!        v                        |
//! +-------------------------------------+
//! |   Access layer (codec + sockets)    |
//! +-------------------------------------+
//! ```
//!
//! The access layer below and the collector above are both expressed as
//! small capabilities ([`StunTransport`], [`ResponseCollector`]); the
//! byte-level codec and the socket manager live outside this crate.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use stun_transaction_core::{
//!     AccessPoint, Request, ResponseCollector, StunMessageEvent, StunTransport,
//!     TransactionManager, TransportAddress,
//! };
//!
//! // Wraps the socket manager of the surrounding stack.
//! #[derive(Debug)]
//! struct UdpAccess;
//!
//! #[async_trait::async_trait]
//! impl StunTransport for UdpAccess {
//!     async fn send_message(
//!         &self,
//!         request: &Request,
//!         access_point: &AccessPoint,
//!         destination: &TransportAddress,
//!     ) -> stun_transaction_core::Result<()> {
//!         // encode `request` and write it on the socket behind `access_point`
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct PrintCollector;
//!
//! impl ResponseCollector for PrintCollector {
//!     fn on_response(&self, event: StunMessageEvent) {
//!         println!("answered: {:?}", event.response());
//!     }
//!
//!     fn on_timeout(&self) {
//!         println!("no answer from the server");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> stun_transaction_core::Result<()> {
//!     let manager = TransactionManager::new(Arc::new(UdpAccess));
//!     let server = TransportAddress::udp("198.51.100.9:3478".parse().unwrap());
//!     let local = AccessPoint::new(TransportAddress::udp("0.0.0.0:5000".parse().unwrap()));
//!
//!     let transaction = manager
//!         .submit(Request::binding(), server, local, Arc::new(PrintCollector))
//!         .await?;
//!     println!("transaction {} in flight", transaction.id());
//!     Ok(())
//! }
//! ```

mod error;

pub mod collector;
pub mod config;
pub mod manager;
pub mod message;
pub mod transaction;
pub mod transport;

pub use collector::ResponseCollector;
pub use config::TransactionConfig;
pub use error::{Error, Result};
pub use manager::TransactionManager;
pub use message::{Attribute, MessageClass, Request, Response, StunMessageEvent};
pub use transaction::{
    RetransmissionPolicy, StunClientTransaction, TransactionId, TransactionState,
};
pub use transport::{AccessPoint, StunTransport, TransportAddress, TransportProtocol};

/// Re-export of common types for easier use
pub mod prelude {
    pub use crate::collector::ResponseCollector;
    pub use crate::config::TransactionConfig;
    pub use crate::error::{Error, Result};
    pub use crate::manager::TransactionManager;
    pub use crate::message::{Attribute, MessageClass, Request, Response, StunMessageEvent};
    pub use crate::transaction::{
        RetransmissionPolicy, StunClientTransaction, TransactionId, TransactionState,
    };
    pub use crate::transport::{AccessPoint, StunTransport, TransportAddress, TransportProtocol};
}
