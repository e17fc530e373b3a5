use std::fmt;

use crate::message::StunMessageEvent;

/// Application-supplied sink for the outcome of a client transaction.
///
/// In the default mode a transaction invokes at most one of the two
/// callbacks, exactly once; a cancelled transaction invokes neither.
/// Callbacks run on engine-internal contexts (the network dispatch path
/// for responses, the transaction worker for timeouts), so they must
/// not block indefinitely.
pub trait ResponseCollector: Send + Sync + fmt::Debug {
    /// A response matching the transaction's identifier arrived.
    fn on_response(&self, event: StunMessageEvent);

    /// The retransmission schedule was exhausted without a response.
    fn on_timeout(&self);
}
