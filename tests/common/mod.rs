//! Shared test doubles: a recording transport with injectable send
//! failures and a recording collector, both stamped against a paused
//! tokio clock so schedule offsets can be asserted exactly.

#![allow(dead_code)]

use std::collections::HashSet;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::{Duration, Instant};

use stun_transaction_core::prelude::*;

/// One send observed by the mock transport.
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub transaction_id: Option<TransactionId>,
    pub offset: Duration,
    pub succeeded: bool,
}

/// Access layer double that records every send attempt and can be told
/// to fail specific attempts (0 is the initial send).
#[derive(Debug)]
pub struct MockTransport {
    started: Instant,
    sent: Mutex<Vec<SentRecord>>,
    failing_attempts: Mutex<HashSet<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            sent: Mutex::new(Vec::new()),
            failing_attempts: Mutex::new(HashSet::new()),
        }
    }

    /// Marks send attempts (by index) that should fail with an I/O error.
    pub fn fail_attempts(&self, attempts: &[usize]) {
        self.failing_attempts.lock().extend(attempts.iter().copied());
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Offsets of every send attempt, in milliseconds from construction.
    pub fn send_offsets_ms(&self) -> Vec<u64> {
        self.sent
            .lock()
            .iter()
            .map(|record| record.offset.as_millis() as u64)
            .collect()
    }
}

#[async_trait::async_trait]
impl StunTransport for MockTransport {
    async fn send_message(
        &self,
        request: &Request,
        _access_point: &AccessPoint,
        destination: &TransportAddress,
    ) -> Result<()> {
        let mut sent = self.sent.lock();
        let attempt = sent.len();
        let fail = self.failing_attempts.lock().contains(&attempt);
        sent.push(SentRecord {
            transaction_id: request.transaction_id().copied(),
            offset: Instant::now() - self.started,
            succeeded: !fail,
        });
        if fail {
            return Err(Error::SendFailed(
                *destination,
                io::Error::new(io::ErrorKind::Other, "injected send failure"),
            ));
        }
        Ok(())
    }
}

/// Collector double recording callbacks and the offsets they fired at.
#[derive(Debug)]
pub struct RecordingCollector {
    started: Instant,
    responses: Mutex<Vec<(StunMessageEvent, Duration)>>,
    timeouts: Mutex<Vec<Duration>>,
}

impl RecordingCollector {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            responses: Mutex::new(Vec::new()),
            timeouts: Mutex::new(Vec::new()),
        }
    }

    pub fn response_count(&self) -> usize {
        self.responses.lock().len()
    }

    pub fn timeout_count(&self) -> usize {
        self.timeouts.lock().len()
    }

    pub fn response_offsets_ms(&self) -> Vec<u64> {
        self.responses
            .lock()
            .iter()
            .map(|(_, offset)| offset.as_millis() as u64)
            .collect()
    }

    pub fn timeout_offsets_ms(&self) -> Vec<u64> {
        self.timeouts
            .lock()
            .iter()
            .map(|offset| offset.as_millis() as u64)
            .collect()
    }
}

impl ResponseCollector for RecordingCollector {
    fn on_response(&self, event: StunMessageEvent) {
        self.responses
            .lock()
            .push((event, Instant::now() - self.started));
    }

    fn on_timeout(&self) {
        self.timeouts.lock().push(Instant::now() - self.started);
    }
}

pub fn server_address() -> TransportAddress {
    TransportAddress::udp("198.51.100.9:3478".parse().unwrap())
}

pub fn local_access_point() -> AccessPoint {
    AccessPoint::new(TransportAddress::udp("192.0.2.10:5000".parse().unwrap()))
}

/// A success response event carrying the given identifier.
pub fn success_event(id: &TransactionId) -> StunMessageEvent {
    let mut response = Response::success(stun_transaction_core::message::methods::BINDING, *id);
    response.add_attribute(Attribute::new(
        stun_transaction_core::message::attributes::XOR_MAPPED_ADDRESS,
        bytes::Bytes::from_static(&[0x00, 0x01, 0xe1, 0x12, 0x5e, 0x12, 0xa4, 0x43]),
    ));
    StunMessageEvent::new(response, server_address(), local_access_point())
}

/// Manager wired to the given transport with the default timing.
pub fn manager_with(transport: Arc<MockTransport>) -> TransactionManager {
    TransactionManager::with_config(transport, TransactionConfig::default())
}
