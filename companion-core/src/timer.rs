use crate::quiz::TimerTicket;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Per-question countdown. Sends its ticket once per period until cancelled.
///
/// Must be armed from inside a Tokio runtime.
pub struct QuizTimer {
    period: Duration,
    armed: Option<(TimerTicket, JoinHandle<()>)>,
}

impl Default for QuizTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizTimer {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self { period, armed: None }
    }

    /// Replaces any running countdown.
    pub fn arm(&mut self, ticket: TimerTicket, tx: UnboundedSender<TimerTicket>) {
        self.cancel();
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut every = interval_at(Instant::now() + period, period);
            every.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                every.tick().await;
                if tx.send(ticket).is_err() {
                    break;
                }
            }
        });
        debug!(session = ticket.session, question = ticket.question, "countdown armed");
        self.armed = Some((ticket, handle));
    }

    pub fn cancel(&mut self) {
        if let Some((ticket, handle)) = self.armed.take() {
            handle.abort();
            debug!(session = ticket.session, question = ticket.question, "countdown cancelled");
        }
    }

    pub fn armed_for(&self) -> Option<TimerTicket> {
        self.armed.as_ref().map(|(t, _)| *t)
    }
}

impl Drop for QuizTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
