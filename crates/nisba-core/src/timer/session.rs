use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Shortest configurable work session, in minutes.
pub const MIN_WORK_MINUTES: u32 = 5;
/// Longest configurable work session, in minutes.
pub const MAX_WORK_MINUTES: u32 = 60;
/// Work durations are chosen in steps of this many minutes.
pub const WORK_MINUTES_STEP: u32 = 5;
/// Every Nth completed work session is followed by a long break.
pub const SESSIONS_BEFORE_LONG_BREAK: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::Work,
        SessionType::ShortBreak,
        SessionType::LongBreak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "shortBreak",
            SessionType::LongBreak => "longBreak",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionType::Work)
    }

    /// Phase that follows this one once it runs to zero.
    ///
    /// `completed_work_sessions` is the counter value *after* a finished
    /// work session has been counted.
    pub fn successor(&self, completed_work_sessions: u32) -> SessionType {
        match self {
            SessionType::Work => {
                if completed_work_sessions > 0
                    && completed_work_sessions % SESSIONS_BEFORE_LONG_BREAK == 0
                {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                }
            }
            SessionType::ShortBreak | SessionType::LongBreak => SessionType::Work,
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "work" | "focus" => Ok(SessionType::Work),
            "shortbreak" | "short" => Ok(SessionType::ShortBreak),
            "longbreak" | "long" => Ok(SessionType::LongBreak),
            other => Err(format!("unknown session type: {other}")),
        }
    }
}

/// Phase lengths derived from the single configured work duration.
///
/// Short break is 20% and long break 60% of the work duration, rounded to
/// whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDurations {
    work_minutes: u32,
}

impl SessionDurations {
    /// Out-of-range values are clamped into
    /// `MIN_WORK_MINUTES..=MAX_WORK_MINUTES`.
    pub fn new(work_minutes: u32) -> Self {
        Self {
            work_minutes: work_minutes.clamp(MIN_WORK_MINUTES, MAX_WORK_MINUTES),
        }
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn minutes(&self, session: SessionType) -> u32 {
        let w = self.work_minutes;
        // round(w * 0.2) and round(w * 0.6) in integer arithmetic; w/5 never
        // lands on a .5 fraction so there is no tie to break.
        match session {
            SessionType::Work => w,
            SessionType::ShortBreak => (w * 2 + 5) / 10,
            SessionType::LongBreak => (w * 6 + 5) / 10,
        }
    }

    pub fn secs(&self, session: SessionType) -> u64 {
        u64::from(self.minutes(session)).saturating_mul(60)
    }
}

impl Default for SessionDurations {
    fn default() -> Self {
        Self::new(25)
    }
}

/// Format seconds as `MM:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_minute_work_gives_five_and_fifteen() {
        let d = SessionDurations::new(25);
        assert_eq!(d.minutes(SessionType::Work), 25);
        assert_eq!(d.minutes(SessionType::ShortBreak), 5);
        assert_eq!(d.minutes(SessionType::LongBreak), 15);
    }

    #[test]
    fn break_lengths_round_to_nearest_minute() {
        // 35 * 0.2 = 7, 35 * 0.6 = 21
        let d = SessionDurations::new(35);
        assert_eq!(d.minutes(SessionType::ShortBreak), 7);
        assert_eq!(d.minutes(SessionType::LongBreak), 21);

        for w in (MIN_WORK_MINUTES..=MAX_WORK_MINUTES).step_by(WORK_MINUTES_STEP as usize) {
            let d = SessionDurations::new(w);
            assert_eq!(
                d.minutes(SessionType::ShortBreak),
                (w as f64 * 0.2).round() as u32
            );
            assert_eq!(
                d.minutes(SessionType::LongBreak),
                (w as f64 * 0.6).round() as u32
            );
        }
    }

    #[test]
    fn work_minutes_are_clamped() {
        assert_eq!(SessionDurations::new(0).work_minutes(), MIN_WORK_MINUTES);
        assert_eq!(SessionDurations::new(500).work_minutes(), MAX_WORK_MINUTES);
    }

    #[test]
    fn every_fourth_work_session_earns_a_long_break() {
        assert_eq!(SessionType::Work.successor(1), SessionType::ShortBreak);
        assert_eq!(SessionType::Work.successor(3), SessionType::ShortBreak);
        assert_eq!(SessionType::Work.successor(4), SessionType::LongBreak);
        assert_eq!(SessionType::Work.successor(8), SessionType::LongBreak);
        assert_eq!(SessionType::ShortBreak.successor(4), SessionType::Work);
        assert_eq!(SessionType::LongBreak.successor(4), SessionType::Work);
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("work".parse::<SessionType>().unwrap(), SessionType::Work);
        assert_eq!(
            "short-break".parse::<SessionType>().unwrap(),
            SessionType::ShortBreak
        );
        assert_eq!(
            "longBreak".parse::<SessionType>().unwrap(),
            SessionType::LongBreak
        );
        assert!("nap".parse::<SessionType>().is_err());
    }

    #[test]
    fn clock_format_pads() {
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
    }
}
