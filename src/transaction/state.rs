use std::sync::atomic::{AtomicU8, Ordering};

/// The lifecycle state of a client transaction.
///
/// Three forces race to finish a transaction: the retransmission worker
/// declaring a timeout, the registry dispatching a matching response,
/// and an external cancel. Whichever wins the compare-and-swap out of
/// `Trying` owns the single terminal action; the losers observe the new
/// state and do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    /// Built but not yet started.
    Initial,
    /// Request sent, schedule armed, registered for response dispatch.
    Trying,
    /// Stopped by an external cancel; no notification was delivered.
    Cancelled,
    /// Finished with a response or a timeout verdict.
    Completed,
}

/// Numeric representation of transaction states for atomic storage.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateValue {
    Initial = 0,
    Trying = 1,
    Cancelled = 2,
    Completed = 3,
}

impl From<TransactionState> for StateValue {
    fn from(state: TransactionState) -> Self {
        match state {
            TransactionState::Initial => StateValue::Initial,
            TransactionState::Trying => StateValue::Trying,
            TransactionState::Cancelled => StateValue::Cancelled,
            TransactionState::Completed => StateValue::Completed,
        }
    }
}

impl From<u8> for TransactionState {
    fn from(value: u8) -> Self {
        match value {
            0 => TransactionState::Initial,
            1 => TransactionState::Trying,
            2 => TransactionState::Cancelled,
            _ => TransactionState::Completed,
        }
    }
}

/// Thread-safe holder of a [`TransactionState`].
///
/// Backed by an `AtomicU8` so the worker, the dispatch path and
/// cancellation can all read and transition the state without a lock.
#[derive(Debug)]
pub struct AtomicTransactionState {
    value: AtomicU8,
}

impl AtomicTransactionState {
    pub fn new(state: TransactionState) -> Self {
        Self {
            value: AtomicU8::new(StateValue::from(state) as u8),
        }
    }

    /// Atomically loads the current state.
    pub fn get(&self) -> TransactionState {
        TransactionState::from(self.value.load(Ordering::Acquire))
    }

    /// Atomically moves `from` to `to` if the current state is `from`.
    ///
    /// Returns whether this call performed the transition. Exactly one
    /// caller can win a given transition; everyone else gets `false`.
    pub fn transition_if(&self, from: TransactionState, to: TransactionState) -> bool {
        self.value
            .compare_exchange(
                StateValue::from(from) as u8,
                StateValue::from(to) as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}
