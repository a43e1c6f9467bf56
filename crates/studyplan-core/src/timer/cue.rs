use serde::{Deserialize, Serialize};

/// Audible feedback requested by a timer transition.
///
/// The engine only says *which* cue to play; rendering it (speaker, terminal
/// bell, desktop notification) is up to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Start,
    Stop,
    Complete,
}

/// One tone of a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Beep {
    pub frequency_hz: u32,
    pub duration_ms: u64,
    /// Delay from the start of the cue.
    pub offset_ms: u64,
}

const START: [Beep; 1] = [Beep {
    frequency_hz: 800,
    duration_ms: 100,
    offset_ms: 0,
}];

const STOP: [Beep; 1] = [Beep {
    frequency_hz: 400,
    duration_ms: 150,
    offset_ms: 0,
}];

const COMPLETE: [Beep; 2] = [
    Beep {
        frequency_hz: 1000,
        duration_ms: 200,
        offset_ms: 0,
    },
    Beep {
        frequency_hz: 1000,
        duration_ms: 200,
        offset_ms: 200,
    },
];

impl SoundCue {
    pub fn beeps(self) -> &'static [Beep] {
        match self {
            SoundCue::Start => &START,
            SoundCue::Stop => &STOP,
            SoundCue::Complete => &COMPLETE,
        }
    }
}
