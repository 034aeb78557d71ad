//! Call session controller
//!
//! Owns one call's lifecycle from connection to terminal outcome. The
//! conversation layer drives it through a small set of actions; each action
//! returns a short caller-presentable string. State lives behind one async
//! mutex so actions serialize, and a terminal latch inside that critical
//! section guarantees that voicemail detection wins any race, later actions
//! become no-ops, and the history sink fires exactly once per session.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use frontdesk_domain::{
    AppointmentRequest, BusinessInfo, CallDirection, CallOutcome, CallRecord, CallTimeouts,
    CallerIdentity, Config, EventId, FailureReason, Result, SchedulingConfig, TimeSlot,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::messages;
use super::ports::{CallHistorySink, CallTransport, JoinSignal};
use crate::scheduling::{CalendarGateway, SlotEngine, SlotVerdict};

/// Where the session is in its lifecycle before reaching a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Connecting,
    Active,
}

/// One call's mutable state. Exclusively owned by the controller, never
/// shared across calls.
struct SessionState {
    id: Uuid,
    caller: CallerIdentity,
    phase: Phase,
    outcome: Option<CallOutcome>,
    notes: Vec<String>,
    meeting_time: Option<DateTime<Utc>>,
    event_id: Option<EventId>,
    recorded: bool,
}

impl SessionState {
    fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Orchestrates one call: queries the slot engine, writes the calendar,
/// records exactly one terminal disposition, and signals the transport to
/// tear down the call.
pub struct CallSessionController {
    gateway: Arc<dyn CalendarGateway>,
    slots: SlotEngine,
    history: Arc<dyn CallHistorySink>,
    transport: Arc<dyn CallTransport>,
    business: BusinessInfo,
    scheduling: SchedulingConfig,
    timeouts: CallTimeouts,
    direction: CallDirection,
    cancel: CancellationToken,
    session: Mutex<SessionState>,
}

impl CallSessionController {
    pub fn new(
        direction: CallDirection,
        caller: CallerIdentity,
        config: Config,
        gateway: Arc<dyn CalendarGateway>,
        history: Arc<dyn CallHistorySink>,
        transport: Arc<dyn CallTransport>,
    ) -> Self {
        let id = Uuid::new_v4();
        info!(
            session = %id,
            outbound = direction.is_outbound(),
            phone = caller.phone.as_deref().unwrap_or("unknown"),
            "call session created"
        );
        let slots = SlotEngine::new(
            Arc::clone(&gateway),
            config.hours.clone(),
            config.scheduling.clone(),
        );
        Self {
            gateway,
            slots,
            history,
            transport,
            business: config.business,
            scheduling: config.scheduling,
            timeouts: config.timeouts,
            direction,
            cancel: CancellationToken::new(),
            session: Mutex::new(SessionState {
                id,
                caller,
                phase: Phase::Connecting,
                outcome: None,
                notes: Vec::new(),
                meeting_time: None,
                event_id: None,
                recorded: false,
            }),
        }
    }

    pub async fn session_id(&self) -> Uuid {
        self.session.lock().await.id
    }

    /// Token the embedder cancels when the enclosing call is abandoned
    /// (e.g. caller hangs up while we are still dialing).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn outcome(&self) -> Option<CallOutcome> {
        self.session.lock().await.outcome.clone()
    }

    pub async fn meeting_time(&self) -> Option<DateTime<Utc>> {
        self.session.lock().await.meeting_time
    }

    pub async fn event_id(&self) -> Option<EventId> {
        self.session.lock().await.event_id.clone()
    }

    pub async fn notes(&self) -> Vec<String> {
        self.session.lock().await.notes.clone()
    }

    /// Bring the session to `Active`.
    ///
    /// Inbound calls activate immediately and return the greeting. Outbound
    /// calls wait (bounded, cancellable) for the remote party to pick up,
    /// then pause for the voicemail grace period so an automated greeting
    /// has time to start before the agent speaks. No answer within the dial
    /// timeout ends the session as `Failed(NoAnswer)`.
    pub async fn connect(&self) -> String {
        let mut session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        if !self.direction.is_outbound() {
            session.phase = Phase::Active;
            info!(session = %session.id, "inbound call active");
            return messages::greeting(&self.business);
        }

        let dial_timeout = self.timeouts.dial();
        info!(session = %session.id, timeout_secs = self.timeouts.dial_secs, "dialing");

        let signal = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                session.notes.push("call abandoned while dialing".to_string());
                self.finish(
                    &mut session,
                    CallOutcome::Failed(FailureReason::Abandoned),
                    None,
                    false,
                )
                .await;
                return "The call was abandoned before it connected.".into();
            }
            joined = tokio::time::timeout(
                dial_timeout,
                self.transport.wait_for_participant(dial_timeout),
            ) => match joined {
                Ok(Ok(signal)) => signal,
                Ok(Err(err)) => JoinSignal::Failed(err.to_string()),
                Err(_elapsed) => JoinSignal::TimedOut,
            },
        };

        match signal {
            JoinSignal::Joined => {
                // Grace period before the first agent action; it does not
                // itself decide voicemail.
                tokio::time::sleep(self.timeouts.voicemail_grace()).await;
                session.phase = Phase::Active;
                info!(session = %session.id, "participant joined, call active");
                messages::CONNECTED.into()
            }
            JoinSignal::TimedOut => {
                warn!(session = %session.id, "dial timed out, no answer");
                session.notes.push("no answer".to_string());
                self.finish(
                    &mut session,
                    CallOutcome::Failed(FailureReason::NoAnswer),
                    None,
                    false,
                )
                .await;
                messages::no_answer(self.timeouts.dial_secs)
            }
            JoinSignal::Failed(reason) => {
                error!(session = %session.id, reason, "dial failed");
                session.notes.push(format!("call failed: {reason}"));
                self.finish(
                    &mut session,
                    CallOutcome::Failed(FailureReason::Transport(reason)),
                    None,
                    false,
                )
                .await;
                "The call could not be completed.".into()
            }
        }
    }

    /// Static business-hours answer.
    pub async fn business_hours(&self) -> String {
        let session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        messages::business_hours(&self.business)
    }

    /// The original (missed) meeting context for reminder calls.
    pub async fn meeting_details(&self) -> String {
        let session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        match &self.direction {
            CallDirection::OutboundReminder { original, purpose } => {
                messages::meeting_details(original, purpose)
            }
            CallDirection::Inbound => messages::NO_PRIOR_MEETING.into(),
        }
    }

    /// Pure availability query for a specific start time; no state change.
    pub async fn check_availability(&self, when: DateTime<Utc>) -> String {
        let session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        match self.availability_reply(when).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(session = %session.id, error = %err, "availability check failed");
                messages::apology_for(&err)
            }
        }
    }

    /// Pure query for up to `suggestion_count` alternative slots after
    /// `from`; no state change.
    pub async fn find_alternatives(&self, from: DateTime<Utc>) -> String {
        let session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        match self.slots.find_next_slots(from, self.scheduling.suggestion_count).await {
            Ok(found) if found.is_empty() => {
                messages::no_alternatives(self.scheduling.search_horizon_days)
            }
            Ok(found) => messages::alternatives(&found),
            Err(err) => {
                error!(session = %session.id, error = %err, "slot search failed");
                messages::apology_for(&err)
            }
        }
    }

    /// Book (or re-book) an appointment. Availability is re-validated
    /// immediately before the write; if the slot was taken in the meantime
    /// the request is rejected and the session stays active so the caller
    /// can pick another time. On a reminder call a successful booking is the
    /// reschedule outcome and ends the call (drain, then disconnect);
    /// inbound bookings leave the session active.
    pub async fn schedule(&self, request: AppointmentRequest) -> String {
        let mut session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        if session.phase != Phase::Active {
            return messages::NOT_CONNECTED.into();
        }
        match self.try_schedule(&mut session, request).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(session = %session.id, error = %err, "scheduling failed");
                messages::apology_for(&err)
            }
        }
    }

    /// Record a free-text message from the caller; no calendar interaction.
    pub async fn take_message(
        &self,
        caller_name: String,
        phone: Option<String>,
        message: Option<String>,
    ) -> String {
        let mut session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        if session.phase != Phase::Active {
            return messages::NOT_CONNECTED.into();
        }
        let text = message.unwrap_or_else(|| "General inquiry".to_string());
        session.notes.push(format!("Message from {caller_name}: {text}"));
        if session.caller.name.is_none() {
            session.caller.name = Some(caller_name.clone());
        }
        if let Some(phone) = phone {
            session.caller.phone.get_or_insert(phone);
        }
        info!(session = %session.id, "message taken");
        messages::message_taken(&caller_name)
    }

    /// An answering machine picked up. Terminal immediately: record with no
    /// meeting time and tear the call down without flushing speech, so no
    /// message is left. Latched first, so it wins any race against other
    /// in-flight actions.
    pub async fn detected_voicemail(&self) -> String {
        let mut session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        info!(session = %session.id, "voicemail detected, hanging up");
        session.notes.push("Voicemail detected - no answer".to_string());
        self.finish(&mut session, CallOutcome::VoicemailDetected, None, false).await;
        messages::VOICEMAIL_HANGUP.into()
    }

    /// Customer will attend the original appointment (reminder calls).
    /// Terminal; recorded with the original meeting time, then drain and
    /// disconnect.
    pub async fn confirm_attendance(&self) -> String {
        let mut session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        let CallDirection::OutboundReminder { original, .. } = &self.direction else {
            return messages::NO_PRIOR_MEETING.into();
        };
        info!(session = %session.id, "attendance confirmed for original appointment");
        session.notes.push("Confirmed attendance for original appointment".to_string());
        let original_start = original.start;
        self.finish(&mut session, CallOutcome::Confirmed, Some(original_start), true).await;
        messages::CONFIRMED_GOODBYE.into()
    }

    /// Conversation complete. Outcome is `Rescheduled` when a new meeting
    /// time was booked during this session, else `Declined`; recorded with
    /// whatever meeting time is on the session, then drain and disconnect.
    pub async fn end_call(&self) -> String {
        let mut session = self.session.lock().await;
        if session.is_terminal() {
            return messages::ALREADY_ENDED.into();
        }
        info!(session = %session.id, rescheduled = session.meeting_time.is_some(), "ending call");
        session.notes.push("Call completed successfully".to_string());
        let outcome = if session.meeting_time.is_some() {
            CallOutcome::Rescheduled
        } else {
            CallOutcome::Declined
        };
        let meeting_time = session.meeting_time;
        self.finish(&mut session, outcome, meeting_time, true).await;
        messages::END_CALL_GOODBYE.into()
    }

    async fn availability_reply(&self, when: DateTime<Utc>) -> Result<String> {
        let candidate = TimeSlot::with_duration(
            when,
            self.slots.policy().default_duration(),
            self.scheduling.timezone,
        )?;
        let reply = match self.slots.check(&candidate).await? {
            SlotVerdict::ClosedDay(day) => messages::closed_day(day, &self.business),
            SlotVerdict::OutsideHours => messages::outside_hours(&self.business),
            SlotVerdict::Busy => messages::slot_booked(&candidate),
            SlotVerdict::Free => messages::slot_available(&candidate),
        };
        Ok(reply)
    }

    async fn try_schedule(
        &self,
        session: &mut SessionState,
        request: AppointmentRequest,
    ) -> Result<String> {
        let duration = request
            .duration_mins
            .map(Duration::minutes)
            .unwrap_or_else(|| self.slots.policy().default_duration());
        let candidate = TimeSlot::with_duration(request.start, duration, self.scheduling.timezone)?;

        // Double-check against a race with other bookings, always.
        match self.slots.check(&candidate).await? {
            SlotVerdict::ClosedDay(day) => return Ok(messages::closed_day(day, &self.business)),
            SlotVerdict::OutsideHours => return Ok(messages::outside_hours(&self.business)),
            SlotVerdict::Busy => return Ok(messages::SLOT_JUST_BOOKED.into()),
            SlotVerdict::Free => {}
        }

        let purpose = if request.purpose.trim().is_empty() {
            match &self.direction {
                CallDirection::OutboundReminder { purpose, .. } => purpose.clone(),
                CallDirection::Inbound => request.purpose.clone(),
            }
        } else {
            request.purpose.clone()
        };
        let phone = request.phone.clone().or_else(|| session.caller.phone.clone());
        let summary = format!("Meeting with {}", request.caller_name);
        let mut description = format!(
            "Purpose: {purpose}\nPhone: {}",
            phone.as_deref().unwrap_or("Not provided")
        );
        if let CallDirection::OutboundReminder { original, .. } = &self.direction {
            description.push_str(&format!("\nRescheduled from: {}", original.display_start()));
        }

        let event_id = self
            .gateway
            .create_event(&self.scheduling.calendar_id, &candidate, &summary, &description)
            .await?;
        info!(
            session = %session.id,
            event = %event_id,
            start = %candidate.start,
            "calendar event created"
        );

        session.meeting_time = Some(candidate.start);
        session.event_id = Some(event_id);
        if session.caller.name.is_none() {
            session.caller.name = Some(request.caller_name.clone());
        }
        if session.caller.phone.is_none() {
            session.caller.phone = phone;
        }

        match &self.direction {
            CallDirection::OutboundReminder { original, .. } => {
                session.notes.push(format!(
                    "Rescheduled from {} to {}. Purpose: {purpose}",
                    original.display_start(),
                    candidate.display_start()
                ));
                let reply = messages::rescheduled(&candidate);
                self.finish(session, CallOutcome::Rescheduled, Some(candidate.start), true).await;
                Ok(reply)
            }
            CallDirection::Inbound => {
                session.notes.push(format!(
                    "Scheduled {} for {}. Purpose: {purpose}",
                    candidate.display_start(),
                    request.caller_name
                ));
                Ok(messages::scheduled(&candidate, &request.caller_name))
            }
        }
    }

    /// Latch the terminal outcome, write the history record exactly once,
    /// then tear down the transport. Recording and transport failures are
    /// logged and swallowed; the conversational outcome always stands.
    async fn finish(
        &self,
        session: &mut SessionState,
        outcome: CallOutcome,
        meeting_time: Option<DateTime<Utc>>,
        drain_first: bool,
    ) {
        if session.is_terminal() {
            return;
        }
        session.outcome = Some(outcome.clone());
        info!(session = %session.id, ?outcome, "call reached terminal outcome");

        if !session.recorded {
            session.recorded = true;
            let record = CallRecord::new(
                session.caller.phone.clone(),
                session.caller.name.clone(),
                meeting_time,
                &session.notes,
            );
            if let Err(err) = self.history.record(&record).await {
                error!(
                    session = %session.id,
                    error = %err,
                    "failed to write call history; outcome stands"
                );
            }
        }

        if drain_first {
            if let Err(err) = self.transport.drain().await {
                warn!(session = %session.id, error = %err, "speech drain failed");
            }
        }
        if let Err(err) = self.transport.disconnect().await {
            warn!(session = %session.id, error = %err, "disconnect failed");
        }
    }
}
