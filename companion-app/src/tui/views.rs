use crate::tui::theme::*;
use companion_core::{
    Notice, Phase, QuizCategory, QuizSession, QuizState, QUESTION_COUNT_CHOICES, TIMED_OUT,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub enum View<'a> {
    Categories { bank: &'a [QuizCategory], sel: usize },
    Count { category: &'a QuizCategory, sel: usize },
    Quiz { session: &'a QuizSession },
}

pub fn draw_ui(f: &mut Frame, area: Rect, view: View, notice: Option<&Notice>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let keys = match &view {
        View::Categories { bank, sel } => {
            draw_categories(f, chunks[0], bank, *sel);
            " ↑/k ↓/j select   Enter choose   q quit "
        }
        View::Count { category, sel } => {
            draw_count(f, chunks[0], category, *sel);
            " ↑/k ↓/j select   Enter start   Esc back "
        }
        View::Quiz { session } => {
            if session.state() == QuizState::Completed {
                draw_results(f, chunks[0], session);
                " r restart   Esc categories   q quit "
            } else {
                draw_question(f, chunks[0], session);
                " 1-9 answer   Enter/n next   Esc abandon "
            }
        }
    };

    if let Some(n) = notice {
        let line = Line::from(vec![
            Span::raw(format!(" {}: ", n.title)).style(notice_style(n.severity)),
            Span::raw(n.body.as_str()),
        ]);
        f.render_widget(Paragraph::new(line), chunks[1]);
    }
    f.render_widget(Paragraph::new(keys).style(footer_style()), chunks[2]);
}

fn draw_categories(f: &mut Frame, area: Rect, bank: &[QuizCategory], sel: usize) {
    let items: Vec<_> = bank
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut lines = vec![Line::from(c.category.clone())];
            if let Some(d) = &c.description {
                lines.push(Line::from(Span::raw(format!("  {d}")).style(hint_style())));
            }
            let item = ListItem::new(lines);
            if i == sel {
                item.style(selected_style())
            } else {
                item
            }
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(Span::raw("Quiz categories").style(title_style()))
            .borders(Borders::ALL),
    );
    f.render_widget(list, area);
}

fn draw_count(f: &mut Frame, area: Rect, category: &QuizCategory, sel: usize) {
    let available = category.questions.len();
    let items: Vec<_> = QUESTION_COUNT_CHOICES
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let label = if *n > available {
                format!("{n} questions (only {available} available)")
            } else {
                format!("{n} questions")
            };
            let line = Line::from(label);
            if i == sel {
                ListItem::new(line.style(selected_style()))
            } else {
                ListItem::new(line)
            }
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(Span::raw(format!("{}: how many questions?", category.category)).style(title_style()))
            .borders(Borders::ALL),
    );
    f.render_widget(list, area);
}

fn draw_question(f: &mut Frame, area: Rect, session: &QuizSession) {
    let QuizState::InProgress { index, time_remaining, phase } = session.state() else {
        return;
    };
    let Some(q) = session.current_question() else {
        return;
    };
    let total = session.questions().len();
    let title = Line::from(vec![
        Span::raw(format!("{}  {}/{}  ", session.category_name(), index + 1, total)).style(title_style()),
        Span::raw(format!("{time_remaining:>2}s")).style(timer_style(time_remaining)),
        Span::raw(format!("  score {}", session.score())).style(hint_style()),
    ]);

    let mut lines = vec![Line::from(q.question.clone()), Line::from("")];
    for (i, opt) in q.options.iter().enumerate() {
        let text = format!(" {}. {opt}", i + 1);
        let style = match phase {
            Phase::AwaitingAnswer => footer_style(),
            Phase::ShowingFeedback if i == q.correct_answer => correct_style(),
            Phase::ShowingFeedback if session.selected() == Some(i) => wrong_style(),
            Phase::ShowingFeedback => hint_style(),
        };
        lines.push(Line::from(Span::raw(text).style(style)));
    }
    if phase == Phase::ShowingFeedback {
        lines.push(Line::from(""));
        let verdict = match session.history().last() {
            Some(a) if a.selected_option == TIMED_OUT => Span::raw("Time's up!").style(wrong_style()),
            Some(a) if a.is_correct => Span::raw("Correct!").style(correct_style()),
            _ => Span::raw("Incorrect.").style(wrong_style()),
        };
        lines.push(Line::from(verdict));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(p, area);
}

fn draw_results(f: &mut Frame, area: Rect, session: &QuizSession) {
    let Some(record) = session.record() else {
        return;
    };
    let mut lines = vec![
        Line::from(Span::raw(format!(
            "You scored {} out of {}.",
            record.score, record.total_questions_attempted
        ))),
        Line::from(Span::raw(record.verdict()).style(title_style())),
        Line::from(""),
    ];
    for (i, a) in record.answered_questions.iter().enumerate() {
        let (mark, style) = if a.is_correct {
            ("✓", correct_style())
        } else {
            ("✗", wrong_style())
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{mark} ")).style(style),
            Span::raw(format!("{}. {}", i + 1, a.question_text)),
        ]));
        let correct = a
            .options
            .get(a.correct_answer_index)
            .map(String::as_str)
            .unwrap_or("?");
        lines.push(Line::from(
            Span::raw(format!(
                "    your answer: {}   correct: {}   {}s",
                a.selected_option, correct, a.time_taken
            ))
            .style(hint_style()),
        ));
    }
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::raw(format!("{}: results", session.category_name())).style(title_style()))
            .borders(Borders::ALL),
    );
    f.render_widget(p, area);
}
