use companion_core::Severity;
use ratatui::style::Stylize;
use ratatui::style::{Color, Style};

pub fn title_style() -> Style { Style::default().fg(Color::Cyan).bold() }
pub fn hint_style() -> Style { Style::default().fg(Color::DarkGray) }
pub fn selected_style() -> Style { Style::default().fg(Color::Yellow).bold() }
pub fn footer_style() -> Style { Style::default().fg(Color::Gray) }
pub fn correct_style() -> Style { Style::default().fg(Color::Green).bold() }
pub fn wrong_style() -> Style { Style::default().fg(Color::Red).bold() }

pub fn timer_style(remaining: u32) -> Style {
    if remaining <= 5 { wrong_style() } else { title_style() }
}

pub fn notice_style(severity: Severity) -> Style {
    match severity {
        Severity::Info => footer_style(),
        Severity::Success => correct_style(),
        Severity::Error => wrong_style(),
    }
}
