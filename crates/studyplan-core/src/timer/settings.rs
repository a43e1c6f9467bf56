use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_MINUTES: u32 = 1;
pub const MAX_WORK_MINUTES: u32 = 120;
pub const MAX_BREAK_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn flipped(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus Session",
            Phase::Break => "Break Time",
        }
    }
}

/// Work/break durations in whole minutes.
///
/// Always within `[1, 120]` for work and `[1, 30]` for break; use
/// [`TimerSettings::clamped`] to build one from unchecked input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub work_minutes: u32,
    pub break_minutes: u32,
}

impl TimerSettings {
    /// Out-of-range values snap to the nearest bound instead of failing.
    pub fn clamped(work_minutes: i64, break_minutes: i64) -> Self {
        Self {
            work_minutes: clamp_minutes(work_minutes, MAX_WORK_MINUTES),
            break_minutes: clamp_minutes(break_minutes, MAX_BREAK_MINUTES),
        }
    }

    pub fn work_secs(&self) -> u64 {
        u64::from(self.work_minutes) * 60
    }

    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_minutes) * 60
    }

    pub fn duration_secs(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.work_secs(),
            Phase::Break => self.break_secs(),
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Preset::Pomodoro.settings()
    }
}

fn clamp_minutes(value: i64, max: u32) -> u32 {
    // Bounds fit in u32, so the cast is lossless after clamping.
    value.clamp(i64::from(MIN_MINUTES), i64::from(max)) as u32
}

/// Built-in work/break combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Quick,
    Pomodoro,
    Long,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Quick, Preset::Pomodoro, Preset::Long];

    pub fn settings(self) -> TimerSettings {
        let (work_minutes, break_minutes) = match self {
            Preset::Quick => (15, 3),
            Preset::Pomodoro => (25, 5),
            Preset::Long => (50, 10),
        };
        TimerSettings {
            work_minutes,
            break_minutes,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Quick => "quick",
            Preset::Pomodoro => "pomodoro",
            Preset::Long => "long",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.settings();
        write!(f, "{} ({}/{})", self.name(), s.work_minutes, s.break_minutes)
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "preset".into(),
                message: format!("unknown preset '{s}' (expected quick, pomodoro or long)"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_non_positive_to_one_minute() {
        let s = TimerSettings::clamped(0, -5);
        assert_eq!(s.work_minutes, 1);
        assert_eq!(s.break_minutes, 1);
    }

    #[test]
    fn clamps_to_upper_bounds() {
        let s = TimerSettings::clamped(500, 31);
        assert_eq!(s.work_minutes, MAX_WORK_MINUTES);
        assert_eq!(s.break_minutes, MAX_BREAK_MINUTES);
    }

    #[test]
    fn in_range_values_pass_through() {
        let s = TimerSettings::clamped(45, 15);
        assert_eq!(s.work_secs(), 45 * 60);
        assert_eq!(s.break_secs(), 15 * 60);
        assert_eq!(s.duration_secs(Phase::Break), 15 * 60);
    }

    #[test]
    fn presets_parse_case_insensitively() {
        assert_eq!("Quick".parse::<Preset>().unwrap(), Preset::Quick);
        assert_eq!("long".parse::<Preset>().unwrap().settings().break_minutes, 10);
        assert!("marathon".parse::<Preset>().is_err());
    }

    #[test]
    fn default_is_classic_pomodoro() {
        assert_eq!(TimerSettings::default(), Preset::Pomodoro.settings());
        assert_eq!(Phase::Focus.flipped(), Phase::Break);
        assert_eq!(Phase::Break.label(), "Break Time");
    }
}
