//! Configuration of client transaction timing.
//!
//! Values come from process environment variables named by the key
//! constants below. A [`TransactionConfig`] is a snapshot: the manager
//! samples it once (at construction or injection) and every transaction
//! copies its timing from that snapshot, so a running transaction never
//! observes a configuration change.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Key setting how many retransmissions follow the initial send.
pub const MAX_RETRANSMISSIONS: &str = "MAX_RETRANSMISSIONS";

/// Key setting the wait in milliseconds before the first retransmission.
pub const ORIGINAL_WAIT_INTERVAL: &str = "ORIGINAL_WAIT_INTERVAL";

/// Key setting the ceiling in milliseconds for the doubling wait.
pub const MAX_WAIT_INTERVAL: &str = "MAX_WAIT_INTERVAL";

/// Key keeping a transaction alive after its first matching response.
pub const KEEP_CLIENT_TRANS_AFTER_A_RESPONSE: &str = "KEEP_CLIENT_TRANS_AFTER_A_RESPONSE";

/// Retransmissions performed when no explicit value is configured.
pub const DEFAULT_MAX_RETRANSMISSIONS: u32 = 6;

/// Initial wait in milliseconds when no explicit value is configured.
pub const DEFAULT_ORIGINAL_WAIT_INTERVAL_MS: u64 = 100;

/// Wait ceiling in milliseconds when no explicit value is configured.
pub const DEFAULT_MAX_WAIT_INTERVAL_MS: u64 = 1600;

/// Snapshot of the configuration governing client transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfig {
    /// Number of retransmissions after the initial send.
    pub max_retransmissions: u32,
    /// Wait before the first retransmission.
    pub original_wait_interval: Duration,
    /// Ceiling the doubling wait never exceeds.
    pub max_wait_interval: Duration,
    /// Keep the transaction registered after a matching response.
    pub keep_after_response: bool,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            max_retransmissions: DEFAULT_MAX_RETRANSMISSIONS,
            original_wait_interval: Duration::from_millis(DEFAULT_ORIGINAL_WAIT_INTERVAL_MS),
            max_wait_interval: Duration::from_millis(DEFAULT_MAX_WAIT_INTERVAL_MS),
            keep_after_response: false,
        }
    }
}

impl TransactionConfig {
    /// Builds a snapshot from the process environment.
    ///
    /// Unset, unparsable, or out-of-bounds values are logged and replaced
    /// by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a snapshot from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            max_retransmissions: parse_int(MAX_RETRANSMISSIONS, &lookup)
                .unwrap_or(DEFAULT_MAX_RETRANSMISSIONS),
            original_wait_interval: Duration::from_millis(
                parse_int(ORIGINAL_WAIT_INTERVAL, &lookup)
                    .unwrap_or(DEFAULT_ORIGINAL_WAIT_INTERVAL_MS),
            ),
            max_wait_interval: Duration::from_millis(
                parse_int(MAX_WAIT_INTERVAL, &lookup).unwrap_or(DEFAULT_MAX_WAIT_INTERVAL_MS),
            ),
            keep_after_response: parse_bool(KEEP_CLIENT_TRANS_AFTER_A_RESPONSE, &lookup)
                .unwrap_or(false),
        };

        if config.max_retransmissions < 1 {
            warn!(
                "{} must be at least 1, using default {}",
                MAX_RETRANSMISSIONS, DEFAULT_MAX_RETRANSMISSIONS
            );
            config.max_retransmissions = DEFAULT_MAX_RETRANSMISSIONS;
        }

        if config.original_wait_interval < Duration::from_millis(1)
            || config.original_wait_interval > config.max_wait_interval
        {
            warn!(
                "wait intervals must satisfy 1ms <= {} <= {}, using defaults",
                ORIGINAL_WAIT_INTERVAL, MAX_WAIT_INTERVAL
            );
            config.original_wait_interval =
                Duration::from_millis(DEFAULT_ORIGINAL_WAIT_INTERVAL_MS);
            config.max_wait_interval = Duration::from_millis(DEFAULT_MAX_WAIT_INTERVAL_MS);
        }

        config
    }
}

fn parse_int<F, T>(key: &str, lookup: &F) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{} does not appear to be an integer, ignoring: {:?}", key, raw);
            None
        }
    }
}

fn parse_bool<F>(key: &str, lookup: &F) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        warn!("{} is not a boolean, ignoring: {:?}", key, raw);
        None
    }
}
