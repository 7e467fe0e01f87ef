use companion_core::{
    Phase, Question, QuizCategory, QuizEvent, QuizSession, QuizState, CoreError,
    QUESTION_TIME_LIMIT, TIMED_OUT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn category(n: usize) -> QuizCategory {
    QuizCategory {
        category: "Capitals".into(),
        slug: "capitals".into(),
        description: None,
        questions: (0..n)
            .map(|i| Question {
                question: format!("Q{i}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer: i % 4,
            })
            .collect(),
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn draw_is_clamped_to_bank_without_duplicates() {
    let mut s = QuizSession::new("u1", &category(7), 25);
    s.start(&mut rng()).unwrap();
    assert_eq!(s.questions().len(), 7);
    let distinct: HashSet<_> = s.questions().iter().map(|q| q.question.clone()).collect();
    assert_eq!(distinct.len(), 7);

    let mut s = QuizSession::new("u1", &category(30), 10);
    s.start(&mut rng()).unwrap();
    assert_eq!(s.questions().len(), 10);
}

#[test]
fn empty_bank_cannot_start() {
    let mut s = QuizSession::new("u1", &category(0), 5);
    assert!(matches!(s.start(&mut rng()), Err(CoreError::Invalid(_))));
    assert_eq!(s.state(), QuizState::NotStarted);
}

#[test]
fn answer_scores_and_records_time_taken() {
    let mut s = QuizSession::new("u1", &category(3), 3);
    let t = s.start(&mut rng()).unwrap();
    s.tick(t);
    s.tick(t);
    let correct = s.current_question().unwrap().correct_answer;
    assert_eq!(
        s.submit_answer(correct),
        Some(QuizEvent::Answered { selected: correct, correct: true })
    );
    assert_eq!(s.score(), 1);
    assert_eq!(s.history()[0].time_taken, 2);
    // feedback phase: further answers and ticks do nothing
    assert_eq!(s.submit_answer(0), None);
    assert_eq!(s.tick(t), None);
}

#[test]
fn countdown_times_out() {
    let mut s = QuizSession::new("u1", &category(2), 2);
    let t = s.start(&mut rng()).unwrap();
    for left in (1..QUESTION_TIME_LIMIT).rev() {
        assert_eq!(s.tick(t), Some(QuizEvent::Ticked { remaining: left }));
    }
    assert_eq!(s.tick(t), Some(QuizEvent::TimedOut));
    let h = &s.history()[0];
    assert_eq!(h.selected_option, TIMED_OUT);
    assert!(!h.is_correct);
    assert_eq!(h.time_taken, QUESTION_TIME_LIMIT);
    assert!(matches!(
        s.state(),
        QuizState::InProgress { phase: Phase::ShowingFeedback, time_remaining: 0, .. }
    ));
}

#[test]
fn stale_ticket_is_ignored() {
    let mut s = QuizSession::new("u1", &category(2), 2);
    let first = s.start(&mut rng()).unwrap();
    s.submit_answer(0).unwrap();
    let Some(QuizEvent::NextQuestion { ticket, .. }) = s.advance() else {
        panic!("expected the second question");
    };
    assert_ne!(first, ticket);
    assert_eq!(s.tick(first), None);
    assert_eq!(s.tick(ticket), Some(QuizEvent::Ticked { remaining: QUESTION_TIME_LIMIT - 1 }));
}

#[test]
fn completion_is_reported_once() {
    let mut s = QuizSession::new("u1", &category(2), 2);
    s.start(&mut rng()).unwrap();
    s.submit_answer(0).unwrap();
    s.advance().unwrap();
    s.submit_answer(1).unwrap();

    let Some(QuizEvent::Completed(record)) = s.advance() else {
        panic!("expected completion");
    };
    assert_eq!(record.total_questions_attempted, 2);
    assert_eq!(record.answered_questions.len(), 2);
    assert_eq!(record.category_slug, "capitals");
    assert_eq!(record.user_id, "u1");
    assert!(record.timestamp.is_none());

    assert_eq!(s.advance(), None);
    assert_eq!(s.state(), QuizState::Completed);
    assert_eq!(s.record(), Some(&record));
}

#[test]
fn restart_only_after_completion() {
    let mut s = QuizSession::new("u1", &category(1), 1);
    let t1 = s.start(&mut rng()).unwrap();
    assert!(s.restart(&mut rng()).is_err());
    s.submit_answer(0).unwrap();
    s.advance().unwrap();

    let t2 = s.restart(&mut rng()).unwrap();
    assert_ne!(t1, t2);
    assert_eq!(s.score(), 0);
    assert!(s.history().is_empty());
    assert!(s.record().is_none());
}

#[test]
fn out_of_range_option_is_ignored() {
    let mut s = QuizSession::new("u1", &category(1), 1);
    s.start(&mut rng()).unwrap();
    assert_eq!(s.submit_answer(9), None);
    assert!(s.history().is_empty());
    assert!(s.ticket().is_some());
}

#[test]
fn ticket_from_another_session_is_ignored() {
    let bank = category(5);
    let mut abandoned = QuizSession::new("u1", &bank, 5);
    let old = abandoned.start(&mut rng()).unwrap();
    drop(abandoned);

    let mut fresh = QuizSession::new("u1", &bank, 5);
    let ticket = fresh.start(&mut rng()).unwrap();
    assert_ne!(old, ticket);
    assert_eq!(fresh.tick(old), None);
    assert_eq!(
        fresh.state(),
        QuizState::InProgress {
            index: 0,
            time_remaining: QUESTION_TIME_LIMIT,
            phase: Phase::AwaitingAnswer,
        }
    );
}
