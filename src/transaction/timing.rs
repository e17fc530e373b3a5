use std::cmp;
use std::time::Duration;

use crate::config::TransactionConfig;

/// The retransmission schedule of one client transaction.
///
/// A transaction waits `original_wait` before its first retransmission
/// and doubles the wait after each one until it reaches `max_wait`,
/// where it stays. After `max_retransmissions` sends one further capped
/// wait is observed before the transaction is declared timed out.
///
/// With the defaults (6 retransmissions, 100 ms initial, 1600 ms cap)
/// requests leave at 0, 100, 300, 700, 1500, 3100 and 4700 ms from the
/// start of the transaction, and the timeout verdict lands at 6300 ms.
///
/// A policy is an immutable copy taken from the configuration snapshot
/// when the transaction is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetransmissionPolicy {
    max_retransmissions: u32,
    original_wait: Duration,
    max_wait: Duration,
}

impl RetransmissionPolicy {
    /// Number of retransmissions following the initial send.
    pub fn max_retransmissions(&self) -> u32 {
        self.max_retransmissions
    }

    /// Wait before the first retransmission.
    pub fn original_wait(&self) -> Duration {
        self.original_wait
    }

    /// Ceiling the wait never exceeds.
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// The wait following `current`: doubled, capped at the ceiling.
    pub fn next_wait(&self, current: Duration) -> Duration {
        cmp::min(current * 2, self.max_wait)
    }
}

impl From<&TransactionConfig> for RetransmissionPolicy {
    fn from(config: &TransactionConfig) -> Self {
        Self {
            max_retransmissions: config.max_retransmissions,
            original_wait: config.original_wait_interval,
            max_wait: config.max_wait_interval,
        }
    }
}

impl Default for RetransmissionPolicy {
    fn default() -> Self {
        Self::from(&TransactionConfig::default())
    }
}
