pub mod auth;
pub mod breaks;
pub mod errors;
pub mod filters;
pub mod layout;
pub mod models;
pub mod notice;
pub mod overlap;
pub mod quiz;
pub mod stats;
pub mod store;
pub mod suggest;
pub mod time;
pub mod timer;
pub mod timetable;

pub use auth::*;
pub use breaks::*;
pub use errors::*;
pub use filters::*;
pub use layout::*;
pub use models::*;
pub use notice::*;
pub use overlap::*;
pub use quiz::*;
pub use stats::*;
pub use store::memory::MemoryStore;
pub use store::{Document, DocumentStore};
pub use suggest::*;
pub use time::*;
pub use timer::QuizTimer;
pub use timetable::*;
