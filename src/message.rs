//! Minimal STUN message scaffolding.
//!
//! The engine treats messages as opaque: it stamps a transaction
//! identifier on outbound requests and matches inbound responses by the
//! identifier the access layer parsed out of the header. Wire encoding
//! and decoding live in the access layer, not here.

use bytes::Bytes;

use crate::transaction::TransactionId;
use crate::transport::{AccessPoint, TransportAddress};

/// STUN method numbers.
pub mod methods {
    /// Binding, the method ICE connectivity checks and address discovery use.
    pub const BINDING: u16 = 0x0001;
}

/// STUN attribute type numbers.
pub mod attributes {
    pub const MAPPED_ADDRESS: u16 = 0x0001;
    pub const ERROR_CODE: u16 = 0x0009;
    pub const XOR_MAPPED_ADDRESS: u16 = 0x0020;
    pub const SOFTWARE: u16 = 0x8022;
}

/// The class of a STUN message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    Request,
    SuccessResponse,
    ErrorResponse,
}

/// A single STUN attribute, carried as an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    attr_type: u16,
    value: Bytes,
}

impl Attribute {
    pub fn new(attr_type: u16, value: Bytes) -> Self {
        Self { attr_type, value }
    }

    pub fn attr_type(&self) -> u16 {
        self.attr_type
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }
}

/// An outbound STUN request.
///
/// Carries the method, attributes, and a transaction-id slot. The engine
/// fills the slot exactly once, before the first send; after that the
/// request is immutable.
#[derive(Debug, Clone)]
pub struct Request {
    method: u16,
    attributes: Vec<Attribute>,
    transaction_id: Option<TransactionId>,
}

impl Request {
    pub fn new(method: u16) -> Self {
        Self {
            method,
            attributes: Vec::new(),
            transaction_id: None,
        }
    }

    /// Creates a Binding request.
    pub fn binding() -> Self {
        Self::new(methods::BINDING)
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn method(&self) -> u16 {
        self.method
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The identifier stamped on this request, if it has been submitted.
    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.transaction_id.as_ref()
    }

    pub(crate) fn set_transaction_id(&mut self, id: TransactionId) {
        self.transaction_id = Some(id);
    }
}

/// An inbound STUN response, already decoded by the access layer.
#[derive(Debug, Clone)]
pub struct Response {
    class: MessageClass,
    method: u16,
    attributes: Vec<Attribute>,
    transaction_id: TransactionId,
}

impl Response {
    pub fn success(method: u16, transaction_id: TransactionId) -> Self {
        Self {
            class: MessageClass::SuccessResponse,
            method,
            attributes: Vec::new(),
            transaction_id,
        }
    }

    pub fn error(method: u16, transaction_id: TransactionId) -> Self {
        Self {
            class: MessageClass::ErrorResponse,
            method,
            attributes: Vec::new(),
            transaction_id,
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn class(&self) -> MessageClass {
        self.class
    }

    pub fn method(&self) -> u16 {
        self.method
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }
}

/// A decoded response together with where it came from and which local
/// endpoint received it. This is what the collector ultimately sees.
#[derive(Debug, Clone)]
pub struct StunMessageEvent {
    response: Response,
    remote_address: TransportAddress,
    access_point: AccessPoint,
}

impl StunMessageEvent {
    pub fn new(
        response: Response,
        remote_address: TransportAddress,
        access_point: AccessPoint,
    ) -> Self {
        Self {
            response,
            remote_address,
            access_point,
        }
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn remote_address(&self) -> &TransportAddress {
        &self.remote_address
    }

    pub fn access_point(&self) -> &AccessPoint {
        &self.access_point
    }
}
