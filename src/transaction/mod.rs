//! The client-transaction state machine and its supporting types.
//!
//! [`StunClientTransaction`] owns one outbound request and drives its
//! retransmission schedule; [`TransactionId`] is the 96-bit demux key;
//! [`RetransmissionPolicy`] describes the timing; [`TransactionState`]
//! and [`AtomicTransactionState`] serialize the race between timeout,
//! response delivery and cancellation.

pub mod client;
pub mod id;
pub mod state;
pub mod timing;

pub use client::StunClientTransaction;
pub use id::{TransactionId, TRANSACTION_ID_LENGTH};
pub use state::{AtomicTransactionState, TransactionState};
pub use timing::RetransmissionPolicy;
