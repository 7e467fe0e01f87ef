use crate::tui::{
    inputs::{map_event, Action},
    views::{self, View},
};
use companion_core::{
    save_attempt, DocumentStore, NoticeBoard, QuizAttemptRecord, QuizCategory, QuizEvent,
    QuizSession, QuizState, QuizTimer, TimerTicket, UserId, QUESTION_COUNT_CHOICES,
};
use crossterm::{
    event::{self},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Screen {
    Categories,
    Count,
    Quiz,
}

pub struct TuiApp {
    store: Arc<dyn DocumentStore>,
    user_id: UserId,
    rt: Arc<Runtime>,
    bank: Vec<QuizCategory>,
    screen: Screen,
    sel: usize,
    count_sel: usize,
    session: Option<QuizSession>,
    timer: QuizTimer,
    tx: UnboundedSender<TimerTicket>,
    rx: UnboundedReceiver<TimerTicket>,
    rng: StdRng,
    notices: NoticeBoard,
}

impl TuiApp {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        user_id: UserId,
        bank: Vec<QuizCategory>,
        default_count: usize,
        rt: Arc<Runtime>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let count_sel = QUESTION_COUNT_CHOICES
            .iter()
            .position(|n| *n == default_count)
            .unwrap_or(1);
        Self {
            store,
            user_id,
            rt,
            bank,
            screen: Screen::Categories,
            sel: 0,
            count_sel,
            session: None,
            timer: QuizTimer::new(),
            tx,
            rx,
            rng: StdRng::from_entropy(),
            notices: NoticeBoard::new(),
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        // countdown tasks are spawned onto this runtime
        let rt = self.rt.clone();
        let _guard = rt.enter();

        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.mainloop(&mut terminal);
        self.timer.cancel();

        disable_raw_mode().ok();
        let mut out: Stdout = std::io::stdout();
        execute!(out, LeaveAlternateScreen).ok();
        terminal.show_cursor().ok();

        res
    }

    fn mainloop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        loop {
            self.notices.prune(Instant::now());
            while let Ok(ticket) = self.rx.try_recv() {
                self.on_tick(ticket);
            }

            terminal.draw(|f| {
                let view = match (self.screen, self.session.as_ref()) {
                    (Screen::Quiz, Some(session)) => View::Quiz { session },
                    (Screen::Count, _) if self.sel < self.bank.len() => View::Count {
                        category: &self.bank[self.sel],
                        sel: self.count_sel,
                    },
                    _ => View::Categories { bank: &self.bank, sel: self.sel },
                };
                views::draw_ui(f, f.size(), view, self.notices.latest());
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                let action = map_event(event::read()?);
                if action == Action::Quit {
                    break;
                }
                match self.screen {
                    Screen::Categories => {
                        if action == Action::Back {
                            break;
                        }
                        self.on_categories(action);
                    }
                    Screen::Count => self.on_count(action),
                    Screen::Quiz => self.on_quiz(action),
                }
            }
        }
        Ok(())
    }

    fn on_categories(&mut self, action: Action) {
        match action {
            Action::Up => self.sel = self.sel.saturating_sub(1),
            Action::Down => {
                if self.sel + 1 < self.bank.len() {
                    self.sel += 1;
                }
            }
            Action::Enter if !self.bank.is_empty() => self.screen = Screen::Count,
            _ => {}
        }
    }

    fn on_count(&mut self, action: Action) {
        match action {
            Action::Up => self.count_sel = self.count_sel.saturating_sub(1),
            Action::Down => {
                if self.count_sel + 1 < QUESTION_COUNT_CHOICES.len() {
                    self.count_sel += 1;
                }
            }
            Action::Back => self.screen = Screen::Categories,
            Action::Enter => self.start_quiz(),
            _ => {}
        }
    }

    fn start_quiz(&mut self) {
        if self.bank.get(self.sel).is_none() {
            return;
        }
        self.stop_timer();
        let category = &self.bank[self.sel];
        let mut session =
            QuizSession::new(self.user_id.clone(), category, QUESTION_COUNT_CHOICES[self.count_sel]);
        match session.start(&mut self.rng) {
            Ok(ticket) => {
                self.timer.arm(ticket, self.tx.clone());
                self.session = Some(session);
                self.screen = Screen::Quiz;
            }
            Err(e) => {
                self.notices.from_error(&e);
            }
        }
    }

    fn on_quiz(&mut self, action: Action) {
        let Some(session) = self.session.as_mut() else {
            self.screen = Screen::Categories;
            return;
        };
        match action {
            Action::Back => {
                self.stop_timer();
                self.session = None;
                self.screen = Screen::Categories;
            }
            Action::Answer(i) => {
                if session.submit_answer(i).is_some() {
                    self.timer.cancel();
                }
            }
            Action::Enter => match session.advance() {
                Some(QuizEvent::NextQuestion { ticket, .. }) => {
                    self.timer.arm(ticket, self.tx.clone());
                }
                Some(QuizEvent::Completed(record)) => self.save(record),
                _ => {}
            },
            Action::Restart if session.state() == QuizState::Completed => {
                match session.restart(&mut self.rng) {
                    Ok(ticket) => self.timer.arm(ticket, self.tx.clone()),
                    Err(e) => {
                        self.notices.from_error(&e);
                    }
                }
            }
            _ => {}
        }
    }

    /// Aborts the countdown and drops ticks it already queued.
    fn stop_timer(&mut self) {
        self.timer.cancel();
        while self.rx.try_recv().is_ok() {}
    }

    fn on_tick(&mut self, ticket: TimerTicket) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(QuizEvent::TimedOut) = session.tick(ticket) {
            self.timer.cancel();
        }
    }

    fn save(&mut self, record: QuizAttemptRecord) {
        match self.rt.block_on(save_attempt(&*self.store, &record)) {
            Ok(_) => {
                self.notices.success("Quiz saved", format!("{}: {}", record.category_name, record.verdict()));
            }
            Err(e) => {
                warn!(error = %e, "quiz attempt not saved");
                self.notices.from_error(&e);
            }
        }
    }
}
