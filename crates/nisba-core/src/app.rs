//! Application state and the interaction flow around it.
//!
//! Every user action goes one way: update the owning state, update the
//! aggregate statistics, persist, then play the matching cue. Nothing reads
//! sound state back into the model.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::audio::{
    default_output, AmbientBackend, AmbientPlayer, AudioSink, Cue, NullSink, SoundEffects,
};
use crate::error::Result;
use crate::events::Event;
use crate::habit::{Habit, HabitDraft, HabitList, HabitToggle};
use crate::stats::{HabitStats, HabitSummary, StreakUpdate};
use crate::storage::database::{KEY_HABITS, KEY_HABIT_STATS, KEY_TASKS, KEY_TIMER_ENGINE};
use crate::storage::{Database, Preferences};
use crate::task::{Task, TaskDraft, TaskList, TaskToggle};
use crate::timer::{Countdown, PomodoroEngine, SessionType};

/// Top-level screens. Switching between them plays the tab cue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Habits,
    Tasks,
    Pomodoro,
    Settings,
}

/// Audio seams handed to the app once at start-up.
pub struct AudioOutput {
    pub cues: Box<dyn AudioSink>,
    pub ambient: Box<dyn AmbientBackend>,
    /// Root holding `sounds/<id>.mp3`.
    pub assets_dir: PathBuf,
}

impl AudioOutput {
    pub fn new(
        cues: Box<dyn AudioSink>,
        ambient: Box<dyn AmbientBackend>,
        assets_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cues,
            ambient,
            assets_dir: assets_dir.into(),
        }
    }

    /// The platform output when there is one, silence otherwise.
    pub fn system(assets_dir: impl Into<PathBuf>) -> Self {
        let (cues, ambient) = default_output();
        Self::new(cues, ambient, assets_dir)
    }

    pub fn silent() -> Self {
        Self::new(
            Box::new(NullSink::new("silent output")),
            Box::new(NullSink::new("silent output")),
            PathBuf::new(),
        )
    }
}

/// Outcome of [`App::toggle_habit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitToggleOutcome {
    #[serde(flatten)]
    pub toggle: HabitToggle,
    /// Set when the toggle counted as a completion for the day streak.
    pub streak_update: Option<StreakUpdate>,
    pub day_streak: u32,
}

pub struct App {
    prefs: Preferences,
    prefs_path: Option<PathBuf>,
    db: Database,
    tasks: TaskList,
    habits: HabitList,
    stats: HabitStats,
    engine: PomodoroEngine,
    effects: SoundEffects,
    ambient: AmbientPlayer,
    tab: Tab,
}

impl App {
    /// Open the app state stored under `data_dir`.
    ///
    /// # Errors
    /// Returns an error only if the directory or the database cannot be
    /// opened. Unreadable preferences or malformed state fall back to
    /// defaults.
    pub fn open(data_dir: &Path, audio: AudioOutput) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let prefs_path = data_dir.join("config.toml");
        let prefs = Preferences::load_or_default_from(&prefs_path);
        let db = Database::open_at(&data_dir.join("nisba.db"))?;
        Self::assemble(prefs, Some(prefs_path), db, audio)
    }

    /// State that lives only as long as the value: nothing touches disk.
    pub fn in_memory(prefs: Preferences, audio: AudioOutput) -> Result<Self> {
        let db = Database::open_memory()?;
        Self::assemble(prefs, None, db, audio)
    }

    fn assemble(
        prefs: Preferences,
        prefs_path: Option<PathBuf>,
        db: Database,
        audio: AudioOutput,
    ) -> Result<Self> {
        let habits = db
            .load::<HabitList>(KEY_HABITS)?
            .unwrap_or_else(|| HabitList::starter(prefs.language));
        let tasks: TaskList = db.load_or_default(KEY_TASKS)?;
        let mut stats: HabitStats = db.load_or_default(KEY_HABIT_STATS)?;
        stats.normalize();

        let mut engine = db
            .load::<PomodoroEngine>(KEY_TIMER_ENGINE)?
            .unwrap_or_else(|| PomodoroEngine::new(prefs.work_minutes, prefs.auto_break));
        if engine.durations().work_minutes() != prefs.work_minutes {
            engine.set_work_minutes(prefs.work_minutes);
        }
        engine.set_auto_advance(prefs.auto_break);

        let effects = SoundEffects::with_settings(audio.cues, prefs.ui_sounds, prefs.ui_volume);
        let mut ambient = AmbientPlayer::new(audio.ambient, audio.assets_dir);
        ambient.set_sound(prefs.sound.id());
        ambient.set_volume(prefs.volume);

        Ok(Self {
            prefs,
            prefs_path,
            db,
            tasks,
            habits,
            stats,
            engine,
            effects,
            ambient,
            tab: Tab::default(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn habits(&self) -> &HabitList {
        &self.habits
    }

    pub fn stats(&self) -> &HabitStats {
        &self.stats
    }

    pub fn engine(&self) -> &PomodoroEngine {
        &self.engine
    }

    pub fn effects(&self) -> &SoundEffects {
        &self.effects
    }

    pub fn ambient(&self) -> &AmbientPlayer {
        &self.ambient
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn summary(&self, today: NaiveDate) -> HabitSummary {
        HabitSummary::compute(&self.stats, &self.habits, today)
    }

    // ── Preferences ──────────────────────────────────────────────────

    /// Change one preference, apply it to the running parts and persist.
    pub fn set_preference(&mut self, key: &str, value: &str) -> Result<()> {
        let was_enabled = self.prefs.ui_sounds;
        self.prefs.set(key, value)?;
        self.apply_preferences();
        self.save_preferences()?;
        self.save_timer()?;
        if key == "ui_sounds" && !was_enabled && self.prefs.ui_sounds {
            self.effects.play(Cue::ButtonClick);
        }
        Ok(())
    }

    pub fn reset_preferences(&mut self) -> Result<()> {
        self.prefs = Preferences::default();
        self.apply_preferences();
        self.save_preferences()?;
        self.save_timer()
    }

    fn apply_preferences(&mut self) {
        if self.engine.durations().work_minutes() != self.prefs.work_minutes {
            self.engine.set_work_minutes(self.prefs.work_minutes);
        }
        self.engine.set_auto_advance(self.prefs.auto_break);
        self.effects.set_enabled(self.prefs.ui_sounds);
        self.effects.set_volume(f32::from(self.prefs.ui_volume) / 100.0);
        self.ambient.set_sound(self.prefs.sound.id());
        self.ambient.set_volume(self.prefs.volume);
    }

    fn save_preferences(&self) -> Result<()> {
        if let Some(path) = &self.prefs_path {
            self.prefs.save_to(path)?;
        }
        Ok(())
    }

    /// Mark the welcome screen as seen.
    pub fn dismiss_welcome(&mut self) -> Result<()> {
        self.effects.play(Cue::ButtonClick);
        if !self.prefs.welcome_seen {
            self.prefs.welcome_seen = true;
            self.save_preferences()?;
        }
        Ok(())
    }

    // ── Navigation and sounds ────────────────────────────────────────

    pub fn switch_tab(&mut self, tab: Tab) -> bool {
        if tab == self.tab {
            return false;
        }
        self.tab = tab;
        self.effects.play(Cue::TabSwitch);
        true
    }

    /// Play a cue on demand, subject to the UI sound settings.
    pub fn play_cue(&mut self, cue: Cue) -> bool {
        if cue == Cue::SessionEnd {
            return self.play_chime();
        }
        self.effects.play(cue)
    }

    /// Any user gesture. Lets a blocked ambient loop retry.
    pub fn user_interaction(&mut self) {
        self.ambient.on_user_interaction();
    }

    fn play_chime(&mut self) -> bool {
        self.effects.play_chime(f32::from(self.prefs.volume) / 100.0)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Result<Task> {
        let task = self.tasks.create(draft, now)?.clone();
        self.db.save(KEY_TASKS, &self.tasks)?;
        Ok(task)
    }

    /// Flip a task. Completing plays the task cue; finishing the last open
    /// task also plays the achievement fanfare.
    pub fn toggle_task(&mut self, id: &str, now: DateTime<Utc>) -> Result<TaskToggle> {
        let outcome = self.tasks.toggle(id, now)?;
        self.db.save(KEY_TASKS, &self.tasks)?;
        if outcome.became_complete {
            self.effects.play(Cue::TaskComplete);
        }
        if outcome.all_done {
            self.effects.play(Cue::Achievement);
        }
        Ok(outcome)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let task = self.tasks.delete(id)?;
        self.db.save(KEY_TASKS, &self.tasks)?;
        Ok(task)
    }

    // ── Habits ───────────────────────────────────────────────────────

    pub fn add_habit(&mut self, draft: HabitDraft) -> Result<Habit> {
        let habit = self.habits.add(draft)?.clone();
        self.db.save(KEY_HABITS, &self.habits)?;
        Ok(habit)
    }

    /// Flip a habit for `today`. Only the incomplete -> complete transition
    /// counts toward the day streak and plays the habit cue.
    pub fn toggle_habit(&mut self, id: &str, today: NaiveDate) -> Result<HabitToggleOutcome> {
        let toggle = self.habits.toggle(id)?;
        let streak_update = toggle
            .became_complete
            .then(|| self.stats.record_completion(today));

        self.db.save(KEY_HABITS, &self.habits)?;
        if streak_update.is_some() {
            self.db.save(KEY_HABIT_STATS, &self.stats)?;
            self.effects.play(Cue::HabitComplete);
        }
        Ok(HabitToggleOutcome {
            toggle,
            streak_update,
            day_streak: self.stats.current_streak(),
        })
    }

    pub fn delete_habit(&mut self, id: &str) -> Result<Habit> {
        let habit = self.habits.delete(id)?;
        self.db.save(KEY_HABITS, &self.habits)?;
        Ok(habit)
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Result<Option<Event>> {
        let event = self.engine.start();
        self.after_timer_command(event)
    }

    pub fn pause_timer(&mut self) -> Result<Option<Event>> {
        let event = self.engine.pause();
        self.after_timer_command(event)
    }

    pub fn reset_timer(&mut self) -> Result<Option<Event>> {
        let event = self.engine.reset();
        self.after_timer_command(event)
    }

    pub fn select_session(&mut self, session: SessionType) -> Result<Option<Event>> {
        let event = self.engine.select_session(session);
        self.after_timer_command(event)
    }

    fn after_timer_command(&mut self, event: Option<Event>) -> Result<Option<Event>> {
        if let Some(event) = &event {
            self.handle_events(std::slice::from_ref(event));
        }
        self.save_timer()?;
        Ok(event)
    }

    /// Catch the timer up with the wall clock.
    pub fn tick_timer(&mut self) -> Vec<Event> {
        let events = self.engine.tick();
        self.handle_events(&events);
        events
    }

    /// Feed `elapsed` into the timer and react to what happened.
    pub fn advance_timer(&mut self, elapsed: Duration) -> Vec<Event> {
        let events = self.engine.advance(elapsed);
        self.handle_events(&events);
        events
    }

    /// Sound side of timer events: the chime when a phase ends, and the
    /// ambient loop following the running state.
    ///
    /// A batch is treated as one moment: however many phases it completes,
    /// the chime plays once, and the ambient loop only takes the state the
    /// last event leaves it in. Catching up after a long absence replays
    /// many phases at once.
    pub fn handle_events(&mut self, events: &[Event]) {
        let mut completed = 0usize;
        let mut ambient_wanted = None;
        for event in events {
            match event {
                Event::TimerStarted { .. } | Event::AutoAdvanced { .. } => {
                    ambient_wanted = Some(true);
                }
                Event::TimerPaused { .. }
                | Event::TimerReset { .. }
                | Event::SessionSelected { .. } => {
                    ambient_wanted = Some(false);
                }
                Event::SessionCompleted { session, next, .. } => {
                    debug!(%session, %next, "session complete");
                    completed += 1;
                    ambient_wanted = Some(false);
                }
                Event::AutoAdvanceScheduled { .. }
                | Event::AutoAdvanceCancelled { .. }
                | Event::StateSnapshot { .. } => {}
            }
        }

        match ambient_wanted {
            Some(true) if !self.ambient.is_playing() => {
                self.ambient.start();
            }
            Some(false) => self.ambient.stop(),
            _ => {}
        }
        if completed > 0 {
            debug!(completed, "playing session-end chime");
            self.play_chime();
        }
    }

    pub fn save_timer(&mut self) -> Result<()> {
        self.engine.sync_clock();
        self.db.save(KEY_TIMER_ENGINE, &self.engine)
    }

    /// Persist everything. Failures are logged per key and the first one
    /// is returned.
    pub fn save_all(&mut self) -> Result<()> {
        self.engine.sync_clock();
        let results = [
            self.db.save(KEY_TASKS, &self.tasks),
            self.db.save(KEY_HABITS, &self.habits),
            self.db.save(KEY_HABIT_STATS, &self.stats),
            self.db.save(KEY_TIMER_ENGINE, &self.engine),
            self.save_preferences(),
        ];
        let mut first = None;
        for result in results {
            if let Err(e) = result {
                warn!("failed to save state: {e}");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

impl Countdown for App {
    fn advance(&mut self, elapsed: Duration) -> Vec<Event> {
        self.advance_timer(elapsed)
    }

    fn is_active(&self) -> bool {
        self.engine.is_active()
    }
}
