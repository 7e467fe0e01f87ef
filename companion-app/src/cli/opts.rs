use clap::{Args, Parser, Subcommand, ValueEnum};
use companion_core::{DayOfWeek, SubjectIcon, WallTime};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum StoreKind {
    Json,
    Sqlite,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "companion", version, about = "Class Companion: timetable, breaks, study suggestions and quizzes")]
pub struct Cli {
    /// Storage backend
    #[arg(long, value_enum, default_value_t = StoreKind::Json)]
    pub store: StoreKind,

    /// SQLite DB path when --store sqlite (defaults to app data dir)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Config file (defaults to config.json in the app data dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "COMPANION_EMAIL")]
    pub email: Option<String>,

    #[arg(long, env = "COMPANION_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Class operations
    #[command(subcommand)]
    Class(ClassCmd),
    /// Print the week grid
    Timetable {
        #[arg(long)]
        day: Option<DayOfWeek>,
    },
    /// List free blocks longer than an hour
    Breaks {
        #[arg(long)]
        day: Option<DayOfWeek>,
    },
    /// Ask the study-suggestion service for study times
    Suggest(SuggestCmd),
    /// Past quiz attempts and totals
    History,
    /// Launch the quiz Terminal UI
    Quiz,
    /// Launch Axum HTTP API
    Api(ApiCmd),
}

#[derive(Debug, Subcommand, Clone)]
pub enum ClassCmd {
    Add(ClassAdd),
    List {
        #[arg(long)]
        day: Option<DayOfWeek>,
        /// Match name or location
        #[arg(long)]
        query: Option<String>,
    },
    /// Remove by id or by (unique) name
    Rm { class: String },
}

#[derive(Debug, Args, Clone)]
pub struct ClassAdd {
    pub name: String,
    #[arg(long, default_value = "Monday")]
    pub day: DayOfWeek,
    /// HH:MM
    #[arg(long, default_value = "09:00")]
    pub start: WallTime,
    /// HH:MM
    #[arg(long, default_value = "10:00")]
    pub end: WallTime,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, default_value = "default")]
    pub icon: SubjectIcon,
}

#[derive(Debug, Args, Clone)]
pub struct SuggestCmd {
    /// Other things to fit into the week
    #[arg(long)]
    pub tasks: Option<String>,
    /// e.g. "Pomodoro", "long focused blocks"
    #[arg(long)]
    pub style: Option<String>,
    /// Print the request instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ApiCmd {
    /// Bind address (host:port)
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: String,
}
