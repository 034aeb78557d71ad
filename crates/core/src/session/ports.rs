//! Port interfaces for call-history recording and call transport
//!
//! The controller drives these boundaries; telephony and persistence
//! implementations live outside the core crate.

use async_trait::async_trait;
use frontdesk_domain::{CallRecord, Result};

/// Durable, at-least-once sink for a call's final disposition.
///
/// The sink does not deduplicate; invoking it exactly once per session is
/// the controller's responsibility.
#[async_trait]
pub trait CallHistorySink: Send + Sync {
    async fn record(&self, record: &CallRecord) -> Result<()>;
}

/// Outcome of waiting for the remote party to join the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinSignal {
    /// A participant (human or machine) is on the line.
    Joined,
    /// The dialer gave up waiting for an answer.
    TimedOut,
    /// The call could not be placed or was dropped while dialing.
    Failed(String),
}

/// Handle to the live call leg: dial-wait, speech flushing, teardown.
///
/// `drain` must resolve once all queued outgoing speech has finished
/// playing; the controller calls it before `disconnect` on successful
/// terminal actions, and skips it for voicemail where immediate teardown is
/// required.
#[async_trait]
pub trait CallTransport: Send + Sync {
    /// Wait for the remote participant to join within `timeout`.
    async fn wait_for_participant(&self, timeout: std::time::Duration) -> Result<JoinSignal>;

    /// Flush queued outgoing speech.
    async fn drain(&self) -> Result<()>;

    /// Tear down the underlying call.
    async fn disconnect(&self) -> Result<()>;
}
