use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use frontdesk_core::{CallHistorySink, CallTransport, JoinSignal};
use frontdesk_domain::{CallRecord, FrontdeskError, Result as DomainResult};

/// In-memory sink that captures every record and can be made to fail.
#[derive(Default)]
pub struct StubHistorySink {
    records: Mutex<Vec<CallRecord>>,
    fail: Mutex<bool>,
}

impl StubHistorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { fail: Mutex::new(true), ..Self::default() })
    }

    pub fn records(&self) -> Vec<CallRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallHistorySink for StubHistorySink {
    async fn record(&self, record: &CallRecord) -> DomainResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(FrontdeskError::Storage("history store down".into()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Transport stub that records the order of drain/disconnect calls and
/// returns a configurable join signal.
pub struct StubTransport {
    join_signal: Mutex<JoinSignal>,
    events: Mutex<Vec<&'static str>>,
}

impl StubTransport {
    pub fn answered() -> Arc<Self> {
        Arc::new(Self {
            join_signal: Mutex::new(JoinSignal::Joined),
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn unanswered() -> Arc<Self> {
        Arc::new(Self {
            join_signal: Mutex::new(JoinSignal::TimedOut),
            events: Mutex::new(Vec::new()),
        })
    }

    /// Ordered teardown events: "drain" and "disconnect".
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallTransport for StubTransport {
    async fn wait_for_participant(&self, _timeout: Duration) -> DomainResult<JoinSignal> {
        Ok(self.join_signal.lock().unwrap().clone())
    }

    async fn drain(&self) -> DomainResult<()> {
        self.events.lock().unwrap().push("drain");
        Ok(())
    }

    async fn disconnect(&self) -> DomainResult<()> {
        self.events.lock().unwrap().push("disconnect");
        Ok(())
    }
}
