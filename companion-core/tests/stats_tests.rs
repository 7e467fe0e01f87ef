use chrono::{Duration, TimeZone, Utc};
use companion_core::{
    daily_streak, list_attempts, save_attempt, summarize, AnsweredQuestion, MemoryStore,
    QuizAttemptRecord, TIMED_OUT,
};

fn answered(correct: bool, timed_out: bool) -> AnsweredQuestion {
    AnsweredQuestion {
        question_text: "q".into(),
        options: vec!["a".into(), "b".into()],
        selected_option: if timed_out { TIMED_OUT.into() } else { "a".into() },
        correct_answer_index: 0,
        is_correct: correct,
        time_taken: 3,
    }
}

fn attempt(category: &str, score: u32, total: u32, days_ago: i64) -> QuizAttemptRecord {
    let base = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let mut answers: Vec<_> = (0..score).map(|_| answered(true, false)).collect();
    answers.extend((score..total).map(|_| answered(false, true)));
    QuizAttemptRecord {
        user_id: "u1".into(),
        category_slug: category.to_lowercase(),
        category_name: category.into(),
        score,
        total_questions_attempted: total,
        answered_questions: answers,
        timestamp: Some(base - Duration::days(days_ago)),
    }
}

#[test]
fn totals_per_category() {
    let all = vec![
        attempt("Math", 4, 5, 0),
        attempt("Math", 1, 5, 1),
        attempt("History", 3, 3, 1),
    ];
    let s = summarize(&all);
    assert_eq!(s.totals.attempts, 3);
    assert_eq!(s.totals.questions, 13);
    assert_eq!(s.totals.correct, 8);
    assert_eq!(s.totals.timed_out, 5);
    assert_eq!(s.per_category["Math"].attempts, 2);
    assert!((s.per_category["History"].accuracy() - 1.0).abs() < f32::EPSILON);
    assert_eq!(s.per_day.len(), 2);
}

#[test]
fn streak_counts_back_from_today() {
    let today = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap().date_naive();
    let all = vec![attempt("Math", 1, 1, 0), attempt("Math", 1, 1, 1), attempt("Math", 1, 1, 3)];
    assert_eq!(daily_streak(&all, today), 2);
    assert_eq!(daily_streak(&all, today + Duration::days(1)), 0);
}

#[test]
fn verdict_thresholds() {
    assert_eq!(attempt("M", 4, 5, 0).verdict(), "Excellent work!");
    assert_eq!(attempt("M", 3, 5, 0).verdict(), "Good effort!");
    assert_eq!(attempt("M", 2, 5, 0).verdict(), "Keep practicing!");
}

#[tokio::test]
async fn saved_attempts_carry_the_store_timestamp() {
    let store = MemoryStore::new();
    let mut a = attempt("Math", 2, 3, 0);
    a.timestamp = None;

    let saved = save_attempt(&store, &a).await.unwrap();
    assert!(saved.timestamp.is_some());

    let listed = list_attempts(&store, "u1").await.unwrap();
    assert_eq!(listed, vec![saved]);
    assert!(list_attempts(&store, "someone-else").await.unwrap().is_empty());
}
