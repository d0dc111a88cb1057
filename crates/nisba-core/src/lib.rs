//! # Nisba Core Library
//!
//! Local core of the Nisba productivity app: daily habits with a day
//! streak, one-off tasks, a Pomodoro focus timer, and procedurally
//! synthesized sound cues. There is no backend; all state lives on this
//! machine. The `nisba` CLI is a thin front end over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a countdown state machine fed with elapsed time, either
//!   from the wall clock (`tick()`) or from an async driver
//! - **Audio**: note tables rendered to PCM and handed to an injected sink
//! - **Storage**: TOML preferences and a SQLite key-value store of JSON
//!   documents
//!
//! ## Key Components
//!
//! - [`App`]: owns all state and routes interactions to stats and sounds
//! - [`PomodoroEngine`]: focus/break cycle
//! - [`SoundEffects`]: UI cues and the session-end chime
//! - [`HabitStats`]: day streak and completion history

pub mod app;
pub mod audio;
pub mod daily;
pub mod error;
pub mod events;
pub mod habit;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use app::{App, AudioOutput, HabitToggleOutcome, Tab};
pub use audio::{AmbientPlayer, AmbientSound, AudioSink, Cue, SoundEffects};
pub use daily::{DayPart, Language, Today};
pub use error::{AudioError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use habit::{Habit, HabitCategory, HabitDraft, HabitList};
pub use stats::{HabitStats, HabitSummary, RateBand, StreakUpdate};
pub use storage::{Database, Preferences, Theme};
pub use task::{Priority, Task, TaskDraft, TaskFilter, TaskList};
pub use timer::{PomodoroEngine, SessionDurations, SessionType};
