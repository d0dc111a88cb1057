mod deferred;
pub mod driver;
mod engine;
mod session;

pub use deferred::{Deferred, DeferredHandle, DeferredSlot};
pub use driver::{Countdown, DriverExit, EventSink};
pub use engine::{PomodoroEngine, AUTO_ADVANCE_DELAY};
pub use session::{
    format_clock, SessionDurations, SessionType, MAX_WORK_MINUTES, MIN_WORK_MINUTES,
    SESSIONS_BEFORE_LONG_BREAK, WORK_MINUTES_STEP,
};
