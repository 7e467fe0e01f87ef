use crate::models::{attempts_path, QuizAttemptRecord};
use crate::store::DocumentStore;
use crate::CoreError;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Totals {
    pub attempts: u32,
    pub questions: u32,
    pub correct: u32,
    pub timed_out: u32,
}

impl Totals {
    pub fn record(&mut self, a: &QuizAttemptRecord) {
        self.attempts += 1;
        self.questions += a.total_questions_attempted;
        self.correct += a.score;
        self.timed_out += a
            .answered_questions
            .iter()
            .filter(|q| q.selected_option == crate::models::TIMED_OUT)
            .count() as u32;
    }

    pub fn accuracy(&self) -> f32 {
        if self.questions == 0 {
            0.0
        } else {
            self.correct as f32 / self.questions as f32
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct StatsSummary {
    pub totals: Totals,
    pub per_category: BTreeMap<String, Totals>,
    pub per_day: BTreeMap<NaiveDate, Totals>,
}

pub fn summarize(attempts: &[QuizAttemptRecord]) -> StatsSummary {
    let mut summary = StatsSummary::default();
    for a in attempts {
        summary.totals.record(a);
        summary
            .per_category
            .entry(a.category_name.clone())
            .or_default()
            .record(a);
        if let Some(ts) = a.timestamp {
            summary.per_day.entry(ts.date_naive()).or_default().record(a);
        }
    }
    summary
}

/// Consecutive days, ending `today`, with at least one attempt.
pub fn daily_streak(attempts: &[QuizAttemptRecord], today: NaiveDate) -> u32 {
    let per_day = summarize(attempts).per_day;
    let mut streak = 0u32;
    let mut day = today;
    while per_day.get(&day).map(|t| t.attempts > 0).unwrap_or(false) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Appends a finished attempt; the returned copy carries the store timestamp.
pub async fn save_attempt<S: DocumentStore + ?Sized>(
    store: &S,
    record: &QuizAttemptRecord,
) -> Result<QuizAttemptRecord, CoreError> {
    let payload = serde_json::to_value(record).map_err(|_| CoreError::Storage("encode attempt"))?;
    let doc = store.append(&attempts_path(&record.user_id), &payload).await?;
    info!(user = %record.user_id, category = %record.category_slug, score = record.score, "quiz attempt saved");
    let mut saved = record.clone();
    saved.timestamp = Some(doc.created_at);
    Ok(saved)
}

pub async fn list_attempts<S: DocumentStore + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<Vec<QuizAttemptRecord>, CoreError> {
    let docs = store.list(&attempts_path(user_id)).await?;
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        match serde_json::from_value::<QuizAttemptRecord>(doc.payload) {
            Ok(mut a) => {
                a.timestamp = Some(doc.created_at);
                out.push(a);
            }
            Err(err) => warn!(attempt = %doc.id, error = %err, "skipping unreadable attempt"),
        }
    }
    Ok(out)
}
