//! Transient user-facing messages ("toasts").

use crate::{CoreError, ErrorKind};
use std::time::{Duration, Instant};

pub const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Notice {
    pub id: u64,
    pub severity: Severity,
    pub title: String,
    pub body: String,
    pub shown_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= NOTICE_LIFETIME
    }
}

/// Title a failure is shown under, by error kind.
pub fn title_for(err: &CoreError) -> &'static str {
    match err.kind() {
        ErrorKind::Validation => "Check your input",
        ErrorKind::Persistence => "Could not save",
        ErrorKind::Integration => "Suggestions unavailable",
        ErrorKind::Authentication => "Sign-in failed",
        ErrorKind::Configuration => "Setup problem",
    }
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, title: impl Into<String>, body: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.notices.push(Notice {
            id: self.next_id,
            severity,
            title: title.into(),
            body: body.into(),
            shown_at: Instant::now(),
        });
        self.next_id
    }

    pub fn info(&mut self, title: impl Into<String>, body: impl Into<String>) -> u64 {
        self.push(Severity::Info, title, body)
    }

    pub fn success(&mut self, title: impl Into<String>, body: impl Into<String>) -> u64 {
        self.push(Severity::Success, title, body)
    }

    pub fn from_error(&mut self, err: &CoreError) -> u64 {
        self.push(Severity::Error, title_for(err), err.to_string())
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        before != self.notices.len()
    }

    /// Drops notices older than [`NOTICE_LIFETIME`].
    pub fn prune(&mut self, now: Instant) {
        self.notices.retain(|n| !n.is_expired(now));
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn visible(&self) -> &[Notice] {
        &self.notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_get_kind_titles() {
        let mut board = NoticeBoard::new();
        board.from_error(&CoreError::Conflict("overlap"));
        let n = board.latest().unwrap();
        assert_eq!(n.severity, Severity::Error);
        assert_eq!(n.title, "Check your input");
        assert_eq!(n.body, "conflict: overlap");

        board.from_error(&CoreError::Storage("write failed"));
        assert_eq!(board.latest().unwrap().title, "Could not save");
    }

    #[test]
    fn dismiss_and_prune() {
        let mut board = NoticeBoard::new();
        let a = board.info("Hi", "there");
        let b = board.success("Saved", "class added");
        assert!(board.dismiss(a));
        assert!(!board.dismiss(a));
        assert_eq!(board.visible().len(), 1);

        let shown = board.latest().unwrap().shown_at;
        board.prune(shown + Duration::from_secs(1));
        assert_eq!(board.latest().map(|n| n.id), Some(b));
        board.prune(shown + NOTICE_LIFETIME);
        assert!(board.visible().is_empty());
    }
}
