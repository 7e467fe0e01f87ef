use crate::time::{WallTime, SLOT_MINUTES};
use crate::CoreError;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type ClassId = String;
pub type UserId = String;

pub const DEFAULT_LOCATION: &str = "N/A";

pub const CLASS_COLORS: [&str; 9] = [
    "red", "blue", "green", "yellow", "purple", "pink", "indigo", "teal", "orange",
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    pub fn short(&self) -> &'static str {
        &self.as_str()[..3]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = CoreError;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let q = s.trim().to_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.as_str().to_lowercase() == q || d.short().to_lowercase() == q)
            .ok_or(CoreError::Invalid("unknown day of week"))
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SubjectIcon {
    #[default]
    Default,
    Literature,
    Science,
    ComputerScience,
    Psychology,
    Physics,
    Math,
    Art,
    Drama,
    Politics,
    Geography,
    Economics,
    Languages,
    Music,
    Film,
    History,
    Philosophy,
}

impl SubjectIcon {
    pub const ALL: [SubjectIcon; 17] = [
        SubjectIcon::Default,
        SubjectIcon::Literature,
        SubjectIcon::Science,
        SubjectIcon::ComputerScience,
        SubjectIcon::Psychology,
        SubjectIcon::Physics,
        SubjectIcon::Math,
        SubjectIcon::Art,
        SubjectIcon::Drama,
        SubjectIcon::Politics,
        SubjectIcon::Geography,
        SubjectIcon::Economics,
        SubjectIcon::Languages,
        SubjectIcon::Music,
        SubjectIcon::Film,
        SubjectIcon::History,
        SubjectIcon::Philosophy,
    ];
}

impl FromStr for SubjectIcon {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let q = s.trim().replace(['-', '_', ' '], "").to_lowercase();
        SubjectIcon::ALL
            .into_iter()
            .find(|i| format!("{i:?}").to_lowercase() == q)
            .ok_or(CoreError::Invalid("unknown subject icon"))
    }
}

/// Anything occupying a half-open `[start, end)` minute range on one day.
pub trait TimeRange {
    fn day(&self) -> DayOfWeek;
    fn start(&self) -> u32;
    fn end(&self) -> u32;

    fn duration(&self) -> u32 {
        self.end().saturating_sub(self.start())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    #[serde(default)]
    pub id: ClassId,
    pub name: String,
    pub day: DayOfWeek,
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub icon_name: SubjectIcon,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

impl TimeRange for ClassEntry {
    fn day(&self) -> DayOfWeek {
        self.day
    }
    fn start(&self) -> u32 {
        self.start_time.minutes()
    }
    fn end(&self) -> u32 {
        self.end_time.minutes()
    }
}

/// Form input for a new class, before validation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassDraft {
    pub name: String,
    pub day: DayOfWeek,
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub icon_name: SubjectIcon,
}

impl Default for ClassDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            day: DayOfWeek::Monday,
            start_time: WallTime::hm(9, 0),
            end_time: WallTime::hm(10, 0),
            location: None,
            icon_name: SubjectIcon::Default,
        }
    }
}

impl ClassDraft {
    pub fn new(
        name: impl Into<String>,
        day: DayOfWeek,
        start_time: WallTime,
        end_time: WallTime,
    ) -> Self {
        Self {
            name: name.into(),
            day,
            start_time,
            end_time,
            ..Self::default()
        }
    }

    /// Trims the name, defaults a blank location and checks the range.
    pub fn validate(mut self) -> Result<Self, CoreError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(CoreError::Invalid("class name is required"));
        }
        if self.end_time <= self.start_time {
            return Err(CoreError::Invalid("end time must be after start time"));
        }
        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();
        self.location = Some(location);
        Ok(self)
    }

    pub fn into_entry<R: Rng + ?Sized>(self, rng: &mut R) -> ClassEntry {
        let color = CLASS_COLORS.choose(rng).map(|c| c.to_string());
        ClassEntry {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location.unwrap_or_else(default_location),
            icon_name: self.icon_name,
            color,
        }
    }
}

impl TimeRange for ClassDraft {
    fn day(&self) -> DayOfWeek {
        self.day
    }
    fn start(&self) -> u32 {
        self.start_time.minutes()
    }
    fn end(&self) -> u32 {
        self.end_time.minutes()
    }
}

/// Free time between classes. Derived on every render, never stored.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BreakInterval {
    pub id: String,
    pub day: DayOfWeek,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub duration_minutes: u32,
}

impl TimeRange for BreakInterval {
    fn day(&self) -> DayOfWeek {
        self.day
    }
    fn start(&self) -> u32 {
        self.start_time.minutes()
    }
    fn end(&self) -> u32 {
        self.end_time.minutes()
    }
}

/// Visible range of the weekly grid.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayWindow {
    pub start: WallTime,
    pub end: WallTime,
}

impl Default for DisplayWindow {
    fn default() -> Self {
        Self {
            start: WallTime::hm(8, 0),
            end: WallTime::hm(22, 0),
        }
    }
}

impl DisplayWindow {
    pub fn new(start: WallTime, end: WallTime) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::Invalid("display window must end after it starts"));
        }
        if !start.is_on_grid() || !end.is_on_grid() {
            return Err(CoreError::Invalid("display window must align to 30 minutes"));
        }
        Ok(Self { start, end })
    }

    pub fn start_minutes(&self) -> u32 {
        self.start.minutes()
    }

    pub fn end_minutes(&self) -> u32 {
        self.end.minutes()
    }

    pub fn rows(&self) -> u32 {
        (self.end_minutes() - self.start_minutes()) / SLOT_MINUTES
    }
}

pub fn timetable_path(user_id: &str) -> String {
    format!("users/{user_id}/timetable")
}

pub fn attempts_path(user_id: &str) -> String {
    format!("users/{user_id}/quizAttempts")
}

// ---------- Quiz ----------

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizCategory {
    pub category: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

pub const TIMED_OUT: &str = "Timed Out";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    /// Text of the chosen option, or [`TIMED_OUT`].
    pub selected_option: String,
    pub correct_answer_index: usize,
    pub is_correct: bool,
    /// Seconds spent on the question.
    pub time_taken: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptRecord {
    pub user_id: UserId,
    pub category_slug: String,
    pub category_name: String,
    pub score: u32,
    pub total_questions_attempted: u32,
    pub answered_questions: Vec<AnsweredQuestion>,
    /// Assigned by the store when the record is appended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl QuizAttemptRecord {
    pub fn ratio(&self) -> f32 {
        if self.total_questions_attempted == 0 {
            0.0
        } else {
            self.score as f32 / self.total_questions_attempted as f32
        }
    }

    pub fn verdict(&self) -> &'static str {
        let r = self.ratio();
        if r >= 0.8 {
            "Excellent work!"
        } else if r >= 0.5 {
            "Good effort!"
        } else {
            "Keep practicing!"
        }
    }
}
