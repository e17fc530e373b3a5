use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{sleep, Duration};
use tracing::{debug, trace, warn};

use crate::collector::ResponseCollector;
use crate::config::TransactionConfig;
use crate::error::{Error, Result};
use crate::message::{Request, StunMessageEvent};
use crate::transaction::id::TransactionId;
use crate::transaction::state::{AtomicTransactionState, TransactionState};
use crate::transaction::timing::RetransmissionPolicy;
use crate::transport::{AccessPoint, StunTransport, TransportAddress};

/// The live-transaction map shared between the manager and every
/// transaction it has started. A transaction removes itself on any
/// terminal transition.
pub(crate) type TransactionMap =
    Arc<Mutex<HashMap<TransactionId, Arc<StunClientTransaction>>>>;

/// A client transaction: one outbound request kept alive by timed
/// retransmissions until a response arrives, the schedule is exhausted,
/// or the transaction is cancelled.
///
/// The initial send happens on the submitter's context; a spawned worker
/// then drives the schedule, waiting `original_wait` before the first
/// retransmission and doubling the wait after each send until it reaches
/// `max_wait`. After the last retransmission one further capped wait is
/// observed before the collector is told the transaction timed out.
///
/// A matching response, a timeout and a cancel are mutually exclusive:
/// the first to win the atomic transition out of [`TransactionState::Trying`]
/// unregisters the transaction and (except for cancel) notifies the
/// collector. Retransmission send failures are logged and do not finish
/// the transaction; a late response is worth more than a clean abort.
pub struct StunClientTransaction {
    id: TransactionId,
    request: Request,
    destination: TransportAddress,
    access_point: AccessPoint,
    transport: Arc<dyn StunTransport>,
    collector: Arc<dyn ResponseCollector>,
    policy: RetransmissionPolicy,
    keep_after_response: bool,
    state: AtomicTransactionState,
    retransmissions: AtomicU32,
    wake: Notify,
    transactions: TransactionMap,
}

impl StunClientTransaction {
    /// Builds a transaction around an already-stamped request.
    pub(crate) fn new(
        id: TransactionId,
        request: Request,
        destination: TransportAddress,
        access_point: AccessPoint,
        transport: Arc<dyn StunTransport>,
        collector: Arc<dyn ResponseCollector>,
        config: &TransactionConfig,
        transactions: TransactionMap,
    ) -> Self {
        Self {
            id,
            request,
            destination,
            access_point,
            transport,
            collector,
            policy: RetransmissionPolicy::from(config),
            keep_after_response: config.keep_after_response,
            state: AtomicTransactionState::new(TransactionState::Initial),
            retransmissions: AtomicU32::new(0),
            wake: Notify::new(),
            transactions,
        }
    }

    /// The identifier stamped on this transaction's request.
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    /// The current lifecycle state.
    pub fn state(&self) -> TransactionState {
        self.state.get()
    }

    /// The request this transaction is retransmitting.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Where the request is being sent.
    pub fn destination(&self) -> &TransportAddress {
        &self.destination
    }

    /// The local endpoint retransmissions are dispatched from.
    pub fn access_point(&self) -> &AccessPoint {
        &self.access_point
    }

    /// How many retransmissions have been performed so far.
    pub fn retransmissions(&self) -> u32 {
        self.retransmissions.load(Ordering::Relaxed)
    }

    /// Sends the initial request on the caller's context, registers the
    /// transaction and spawns the retransmission worker.
    ///
    /// If the first send fails the transaction is never registered and
    /// the error is returned to the submitter. Calling `start` a second
    /// time fails with [`Error::AlreadyStarted`].
    pub(crate) async fn start(self: Arc<Self>) -> Result<()> {
        if !self
            .state
            .transition_if(TransactionState::Initial, TransactionState::Trying)
        {
            return Err(Error::AlreadyStarted);
        }

        if let Err(e) = self.send_request().await {
            self.state
                .transition_if(TransactionState::Trying, TransactionState::Cancelled);
            return Err(e);
        }

        self.transactions
            .lock()
            .insert(self.id, Arc::clone(&self));
        debug!(id = %self.id, destination = %self.destination, "client transaction started");

        tokio::spawn(self.run());
        Ok(())
    }

    /// Stops the transaction without notifying the collector.
    ///
    /// Wakes the worker out of its scheduled sleep; no further datagrams
    /// leave after this returns. Calling `cancel` on a finished
    /// transaction is a no-op, so it is safe from any context, any
    /// number of times, including from inside a collector callback.
    pub fn cancel(&self) {
        if self
            .state
            .transition_if(TransactionState::Trying, TransactionState::Cancelled)
        {
            self.unregister();
            self.wake.notify_one();
            debug!(id = %self.id, "client transaction cancelled");
        }
    }

    /// Hands a matching response to this transaction.
    ///
    /// In the default mode the transaction completes, unregisters and
    /// invokes the collector exactly once; a second matching response
    /// finds the transaction finished and is dropped. When the
    /// keep-after-response mode is on the transaction stays registered
    /// and armed, the collector sees every matching response, and the
    /// timeout verdict still fires when the schedule runs out.
    pub(crate) fn deliver_response(&self, event: StunMessageEvent) {
        if self.keep_after_response {
            if self.state.get() == TransactionState::Trying {
                trace!(id = %self.id, "delivering response to retained transaction");
                self.collector.on_response(event);
            } else {
                trace!(id = %self.id, "response for finished transaction, dropping");
            }
            return;
        }

        if self
            .state
            .transition_if(TransactionState::Trying, TransactionState::Completed)
        {
            self.unregister();
            self.wake.notify_one();
            debug!(id = %self.id, "response received, transaction completed");
            self.collector.on_response(event);
        } else {
            trace!(id = %self.id, "response for finished transaction, dropping");
        }
    }

    /// The retransmission schedule, driven on the spawned worker.
    async fn run(self: Arc<Self>) {
        let mut wait = self.policy.original_wait();

        for _ in 0..self.policy.max_retransmissions() {
            self.wait_or_wake(wait).await;
            if self.state.get() != TransactionState::Trying {
                return;
            }

            wait = self.policy.next_wait(wait);

            match self.send_request().await {
                Ok(()) => {
                    trace!(id = %self.id, "request retransmitted");
                }
                Err(e) => {
                    warn!(id = %self.id, error = %e, "client transaction retransmission failed");
                }
            }
            self.retransmissions.fetch_add(1, Ordering::Relaxed);
        }

        // Give the last retransmission one capped interval to be answered.
        self.wait_or_wake(self.policy.next_wait(wait)).await;

        if self
            .state
            .transition_if(TransactionState::Trying, TransactionState::Completed)
        {
            self.unregister();
            debug!(id = %self.id, "client transaction timed out");
            self.collector.on_timeout();
        }
    }

    /// Sleeps up to `duration`, returning early when the transaction is
    /// woken by a response or a cancel.
    async fn wait_or_wake(&self, duration: Duration) {
        tokio::select! {
            _ = sleep(duration) => {}
            _ = self.wake.notified() => {}
        }
    }

    /// Hands the request to the access layer, unless the transaction has
    /// already finished.
    async fn send_request(&self) -> Result<()> {
        if self.state.get() != TransactionState::Trying {
            trace!(id = %self.id, "not resending for a finished transaction");
            return Ok(());
        }
        self.transport
            .send_message(&self.request, &self.access_point, &self.destination)
            .await
    }

    fn unregister(&self) {
        self.transactions.lock().remove(&self.id);
    }
}

impl fmt::Debug for StunClientTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StunClientTransaction")
            .field("id", &self.id)
            .field("state", &self.state.get())
            .field("destination", &self.destination)
            .field("retransmissions", &self.retransmissions())
            .finish()
    }
}
