use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::Result;

/// Number of bytes in a STUN transaction identifier.
pub const TRANSACTION_ID_LENGTH: usize = 12;

/// Uniquely identifies a STUN transaction.
///
/// A 96-bit value carried in the STUN message header. The engine stamps
/// it on the request before the first send and the registry uses it to
/// match inbound responses to the transaction that is waiting for them.
///
/// Identifiers are drawn from the operating system's entropy source, so
/// a collision among concurrently live transactions is negligible.
/// Equality and hashing are byte-wise.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId {
    bytes: [u8; TRANSACTION_ID_LENGTH],
}

impl TransactionId {
    /// Generates a fresh random identifier.
    ///
    /// Fails only if the entropy source cannot be read.
    pub fn new() -> Result<Self> {
        let mut bytes = [0u8; TRANSACTION_ID_LENGTH];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(Self { bytes })
    }

    /// Builds an identifier from raw header bytes.
    ///
    /// Used by access layers that have already parsed the identifier out
    /// of an inbound datagram.
    pub fn from_bytes(bytes: [u8; TRANSACTION_ID_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Returns the raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; TRANSACTION_ID_LENGTH] {
        &self.bytes
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self)
    }
}
