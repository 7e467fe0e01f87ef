//! One timed multiple-choice quiz attempt.
//!
//! `NotStarted -> InProgress(index, remaining, AwaitingAnswer | ShowingFeedback) -> Completed`.
//! The countdown is driven from outside through [`QuizSession::tick`]; every
//! tick carries the [`TimerTicket`] it was armed for so a late tick from an
//! already answered question, or from a previous run, is ignored.

use crate::models::{AnsweredQuestion, Question, QuizAttemptRecord, QuizCategory, UserId, TIMED_OUT};
use crate::CoreError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Seconds allowed per question.
pub const QUESTION_TIME_LIMIT: u32 = 15;
pub const QUESTION_COUNT_CHOICES: [usize; 5] = [5, 10, 15, 20, 25];

// Run ids are unique per process, so tickets never match across sessions.
static NEXT_RUN: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingAnswer,
    ShowingFeedback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizState {
    NotStarted,
    InProgress {
        index: usize,
        time_remaining: u32,
        phase: Phase,
    },
    Completed,
}

/// Identity of the countdown for one question of one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerTicket {
    pub session: u64,
    pub question: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QuizEvent {
    Ticked { remaining: u32 },
    Answered { selected: usize, correct: bool },
    TimedOut,
    NextQuestion { index: usize, ticket: TimerTicket },
    Completed(QuizAttemptRecord),
}

pub struct QuizSession {
    user_id: UserId,
    category_slug: String,
    category_name: String,
    bank: Vec<Question>,
    desired_count: usize,
    run: u64,
    questions: Vec<Question>,
    state: QuizState,
    score: u32,
    selected: Option<usize>,
    history: Vec<AnsweredQuestion>,
    record: Option<QuizAttemptRecord>,
}

impl QuizSession {
    pub fn new(user_id: impl Into<UserId>, category: &QuizCategory, desired_count: usize) -> Self {
        Self {
            user_id: user_id.into(),
            category_slug: category.slug.clone(),
            category_name: category.category.clone(),
            bank: category.questions.clone(),
            desired_count,
            run: 0,
            questions: Vec::new(),
            state: QuizState::NotStarted,
            score: 0,
            selected: None,
            history: Vec::new(),
            record: None,
        }
    }

    /// Draws `min(desired, bank)` distinct questions and arms the first one.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TimerTicket, CoreError> {
        if self.bank.is_empty() {
            return Err(CoreError::Invalid("question bank is empty"));
        }
        if self.desired_count == 0 {
            return Err(CoreError::Invalid("question count must be positive"));
        }
        let mut draw = self.bank.clone();
        draw.shuffle(rng);
        draw.truncate(self.desired_count.min(self.bank.len()));

        self.run = NEXT_RUN.fetch_add(1, Ordering::Relaxed);
        self.questions = draw;
        self.score = 0;
        self.selected = None;
        self.history.clear();
        self.record = None;
        self.state = QuizState::InProgress {
            index: 0,
            time_remaining: QUESTION_TIME_LIMIT,
            phase: Phase::AwaitingAnswer,
        };
        Ok(self.ticket_for(0))
    }

    /// Fresh draw with the same category and count. Only valid once completed.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TimerTicket, CoreError> {
        if self.state != QuizState::Completed {
            return Err(CoreError::Invalid("quiz is still running"));
        }
        self.start(rng)
    }

    /// One elapsed second for `ticket`. Stale tickets are ignored.
    pub fn tick(&mut self, ticket: TimerTicket) -> Option<QuizEvent> {
        if self.ticket() != Some(ticket) {
            return None;
        }
        let QuizState::InProgress { index, time_remaining, .. } = self.state else {
            return None;
        };
        let remaining = time_remaining.saturating_sub(1);
        if remaining == 0 {
            return Some(self.time_out(index));
        }
        self.state = QuizState::InProgress {
            index,
            time_remaining: remaining,
            phase: Phase::AwaitingAnswer,
        };
        Some(QuizEvent::Ticked { remaining })
    }

    /// Ignored unless a question is waiting for an answer.
    pub fn submit_answer(&mut self, option: usize) -> Option<QuizEvent> {
        let QuizState::InProgress {
            index,
            time_remaining,
            phase: Phase::AwaitingAnswer,
        } = self.state
        else {
            return None;
        };
        let q = &self.questions[index];
        let selected_text = q.options.get(option)?.clone();
        let correct = option == q.correct_answer;
        self.history.push(AnsweredQuestion {
            question_text: q.question.clone(),
            options: q.options.clone(),
            selected_option: selected_text,
            correct_answer_index: q.correct_answer,
            is_correct: correct,
            time_taken: QUESTION_TIME_LIMIT - time_remaining,
        });
        if correct {
            self.score += 1;
        }
        self.selected = Some(option);
        self.state = QuizState::InProgress {
            index,
            time_remaining,
            phase: Phase::ShowingFeedback,
        };
        Some(QuizEvent::Answered { selected: option, correct })
    }

    /// Moves past the feedback. The last question yields the attempt record,
    /// exactly once; calls after completion do nothing.
    pub fn advance(&mut self) -> Option<QuizEvent> {
        let QuizState::InProgress {
            index,
            phase: Phase::ShowingFeedback,
            ..
        } = self.state
        else {
            return None;
        };
        self.selected = None;
        if index + 1 < self.questions.len() {
            let next = index + 1;
            self.state = QuizState::InProgress {
                index: next,
                time_remaining: QUESTION_TIME_LIMIT,
                phase: Phase::AwaitingAnswer,
            };
            return Some(QuizEvent::NextQuestion {
                index: next,
                ticket: self.ticket_for(next),
            });
        }
        self.state = QuizState::Completed;
        let record = QuizAttemptRecord {
            user_id: self.user_id.clone(),
            category_slug: self.category_slug.clone(),
            category_name: self.category_name.clone(),
            score: self.score,
            total_questions_attempted: self.questions.len() as u32,
            answered_questions: self.history.clone(),
            timestamp: None,
        };
        self.record = Some(record.clone());
        Some(QuizEvent::Completed(record))
    }

    /// Ticket of the question currently waiting for an answer.
    pub fn ticket(&self) -> Option<TimerTicket> {
        match self.state {
            QuizState::InProgress {
                index,
                phase: Phase::AwaitingAnswer,
                ..
            } => Some(self.ticket_for(index)),
            _ => None,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::InProgress { index, .. } => self.questions.get(index),
            _ => None,
        }
    }

    /// Option picked for the question on feedback, `None` after a timeout.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn history(&self) -> &[AnsweredQuestion] {
        &self.history
    }

    pub fn record(&self) -> Option<&QuizAttemptRecord> {
        self.record.as_ref()
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    fn ticket_for(&self, question: usize) -> TimerTicket {
        TimerTicket {
            session: self.run,
            question,
        }
    }

    fn time_out(&mut self, index: usize) -> QuizEvent {
        let q = &self.questions[index];
        self.history.push(AnsweredQuestion {
            question_text: q.question.clone(),
            options: q.options.clone(),
            selected_option: TIMED_OUT.to_string(),
            correct_answer_index: q.correct_answer,
            is_correct: false,
            time_taken: QUESTION_TIME_LIMIT,
        });
        self.selected = None;
        self.state = QuizState::InProgress {
            index,
            time_remaining: 0,
            phase: Phase::ShowingFeedback,
        };
        QuizEvent::TimedOut
    }
}
