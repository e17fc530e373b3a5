use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::collector::ResponseCollector;
use crate::config::TransactionConfig;
use crate::error::Result;
use crate::message::{Request, StunMessageEvent};
use crate::transaction::client::TransactionMap;
use crate::transaction::{StunClientTransaction, TransactionId};
use crate::transport::{AccessPoint, StunTransport, TransportAddress};

/// Owns the live client transactions and multiplexes inbound responses
/// onto them by transaction identifier.
///
/// Applications submit requests here; the network reader, having decoded
/// an inbound datagram, hands the parsed identifier and event to
/// [`deliver`](TransactionManager::deliver). Transactions remove
/// themselves on any terminal transition, so the map only ever holds
/// transactions that are still waiting.
#[derive(Clone)]
pub struct TransactionManager {
    transport: Arc<dyn StunTransport>,
    config: TransactionConfig,
    client_transactions: TransactionMap,
}

impl TransactionManager {
    /// Creates a manager whose timing configuration is sampled from the
    /// process environment.
    pub fn new(transport: Arc<dyn StunTransport>) -> Self {
        Self::with_config(transport, TransactionConfig::from_env())
    }

    /// Creates a manager with an explicit configuration snapshot.
    pub fn with_config(transport: Arc<dyn StunTransport>, config: TransactionConfig) -> Self {
        Self {
            transport,
            config,
            client_transactions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Stamps a fresh identifier on `request`, sends it, and arms the
    /// retransmission schedule.
    ///
    /// The first datagram leaves on the caller's context; if that send
    /// (or identifier generation) fails the error is returned and
    /// nothing is registered. On success the returned handle can be used
    /// to observe or cancel the transaction.
    pub async fn submit(
        &self,
        mut request: Request,
        destination: TransportAddress,
        access_point: AccessPoint,
        collector: Arc<dyn ResponseCollector>,
    ) -> Result<Arc<StunClientTransaction>> {
        let id = TransactionId::new()?;
        request.set_transaction_id(id);

        let transaction = Arc::new(StunClientTransaction::new(
            id,
            request,
            destination,
            access_point,
            self.transport.clone(),
            collector,
            &self.config,
            self.client_transactions.clone(),
        ));
        Arc::clone(&transaction).start().await?;
        Ok(transaction)
    }

    /// Routes an inbound response event to the transaction waiting for it.
    ///
    /// Returns `None` when a live transaction matched `id` and took the
    /// event. A stray response changes no state and is handed back to
    /// the caller, who decides what to do with it (usually: discard).
    pub fn deliver(
        &self,
        id: &TransactionId,
        event: StunMessageEvent,
    ) -> Option<StunMessageEvent> {
        let transaction = self.client_transactions.lock().get(id).cloned();
        match transaction {
            Some(transaction) => {
                transaction.deliver_response(event);
                None
            }
            None => {
                trace!(id = %id, "response does not match any client transaction");
                Some(event)
            }
        }
    }

    /// Returns whether a transaction with `id` is still registered.
    pub fn transaction_exists(&self, id: &TransactionId) -> bool {
        self.client_transactions.lock().contains_key(id)
    }

    /// Number of transactions currently waiting for a response.
    pub fn active_transaction_count(&self) -> usize {
        self.client_transactions.lock().len()
    }

    /// Cancels every registered transaction. Used at shutdown; no
    /// collector callbacks fire.
    pub fn cancel_all(&self) {
        let transactions: Vec<Arc<StunClientTransaction>> = {
            let mut map = self.client_transactions.lock();
            map.drain().map(|(_, transaction)| transaction).collect()
        };
        debug!(count = transactions.len(), "cancelling all client transactions");
        for transaction in transactions {
            transaction.cancel();
        }
    }
}

impl fmt::Debug for TransactionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionManager")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .field("active_transactions", &self.active_transaction_count())
            .finish()
    }
}
