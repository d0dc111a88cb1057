//! One-second countdown loop on a tokio interval.
//!
//! The driver owns the only repeating timer for a countdown: it measures
//! the real time between interval ticks and hands it to
//! [`Countdown::advance`]. It returns once the countdown goes idle (not
//! running and nothing pending) or when `shutdown` resolves.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use super::PomodoroEngine;
use crate::events::Event;

/// Tick period of the countdown.
pub const TICK: Duration = Duration::from_secs(1);

/// Something the driver can push time into.
pub trait Countdown {
    fn advance(&mut self, elapsed: Duration) -> Vec<Event>;
    fn is_active(&self) -> bool;
}

impl Countdown for PomodoroEngine {
    fn advance(&mut self, elapsed: Duration) -> Vec<Event> {
        PomodoroEngine::advance(self, elapsed)
    }

    fn is_active(&self) -> bool {
        PomodoroEngine::is_active(self)
    }
}

/// Receives every tick and every event the countdown produces.
pub trait EventSink<C: ?Sized> {
    fn on_tick(&mut self, _countdown: &C) {}
    fn on_event(&mut self, countdown: &C, event: &Event);
}

impl<C: ?Sized, F> EventSink<C> for F
where
    F: FnMut(&C, &Event),
{
    fn on_event(&mut self, countdown: &C, event: &Event) {
        self(countdown, event)
    }
}

/// Why [`run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverExit {
    /// The countdown stopped and has nothing pending.
    Idle,
    /// The shutdown future resolved first.
    Shutdown,
}

pub async fn run<C, S, F>(countdown: &mut C, sink: &mut S, shutdown: F) -> DriverExit
where
    C: Countdown + ?Sized,
    S: EventSink<C> + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut interval = time::interval(TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;
    let mut last = Instant::now();

    while countdown.is_active() {
        tokio::select! {
            _ = &mut shutdown => return DriverExit::Shutdown,
            _ = interval.tick() => {
                let now = Instant::now();
                let events = countdown.advance(now.duration_since(last));
                last = now;
                sink.on_tick(countdown);
                for event in &events {
                    sink.on_event(countdown, event);
                }
            }
        }
    }
    DriverExit::Idle
}
