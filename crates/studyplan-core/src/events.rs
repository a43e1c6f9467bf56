use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, SoundCue, TimerState};

/// Every timer state change produces an Event.
/// Presentation layers redraw from these; `cue` is set only while sound is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        cue: Option<SoundCue>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        cue: Option<SoundCue>,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// The countdown for `phase` reached zero.
    PhaseCompleted {
        phase: Phase,
        duration_secs: u64,
        cue: Option<SoundCue>,
        at: DateTime<Utc>,
    },
    /// Emitted right after `PhaseCompleted`, once the new phase is loaded.
    PhaseChanged {
        from: Phase,
        to: Phase,
        label: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SoundToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
    /// Everything needed to redraw the timer.
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        label: String,
        remaining_secs: u64,
        total_secs: u64,
        display: String,
        running: bool,
        sound_enabled: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            Event::TimerStarted { cue, .. }
            | Event::TimerPaused { cue, .. }
            | Event::PhaseCompleted { cue, .. } => *cue,
            _ => None,
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, Event::StateSnapshot { .. })
    }
}
