mod cue;
mod driver;
mod engine;
mod settings;

pub use cue::{Beep, SoundCue};
pub use driver::{TickHandle, TimerDriver};
pub use engine::{format_clock, TimerEngine, TimerState};
pub use settings::{Phase, Preset, TimerSettings, MAX_BREAK_MINUTES, MAX_WORK_MINUTES, MIN_MINUTES};
