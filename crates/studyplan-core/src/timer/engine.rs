//! Timer engine implementation.
//!
//! The timer engine is a two-phase (Focus/Break) countdown. It does not use
//! internal threads - the caller is responsible for calling `tick()` once per
//! elapsed second while the timer runs (see [`super::TimerDriver`]).
//!
//! ## State Transitions
//!
//! ```text
//! IdleFocus  --start--> RunningFocus --tick to 0--> IdleBreak
//! IdleBreak  --start--> RunningBreak --tick to 0--> IdleFocus
//! Running*   --pause--> Idle* (same phase)
//! any        --reset--> IdleFocus (full work duration)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerSettings::default());
//! engine.start();
//! // Once per second:
//! for event in engine.tick() { render(event) }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cue::SoundCue;
use super::settings::{Phase, TimerSettings};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    IdleFocus,
    RunningFocus,
    IdleBreak,
    RunningBreak,
}

impl TimerState {
    fn of(running: bool, phase: Phase) -> Self {
        match (running, phase) {
            (false, Phase::Focus) => TimerState::IdleFocus,
            (true, Phase::Focus) => TimerState::RunningFocus,
            (false, Phase::Break) => TimerState::IdleBreak,
            (true, Phase::Break) => TimerState::RunningBreak,
        }
    }
}

/// Core timer engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    settings: TimerSettings,
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    sound_enabled: bool,
}

impl TimerEngine {
    /// Create an idle engine in the Focus phase with a full work duration.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            phase: Phase::Focus,
            remaining_secs: settings.work_secs(),
            running: false,
            sound_enabled: true,
        }
    }

    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        TimerState::of(self.running, self.phase)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    /// Configured length of the current phase.
    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.phase)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            phase: self.phase,
            label: self.phase.label().to_string(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            display: format_clock(self.remaining_secs),
            running: self.running,
            sound_enabled: self.sound_enabled,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply new durations. Remaining time is only reloaded while idle.
    pub fn configure(&mut self, work_minutes: i64, break_minutes: i64) -> Vec<Event> {
        self.settings = TimerSettings::clamped(work_minutes, break_minutes);
        debug!(
            work = self.settings.work_minutes,
            brk = self.settings.break_minutes,
            "timer configured"
        );
        if self.running {
            return Vec::new();
        }
        self.remaining_secs = self.total_secs();
        vec![self.snapshot()]
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        debug!(phase = ?self.phase, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            cue: self.cue(SoundCue::Start),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        debug!(phase = ?self.phase, remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            cue: self.cue(SoundCue::Stop),
            at: Utc::now(),
        })
    }

    /// Back to an idle Focus phase with the full work duration.
    pub fn reset(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.pause().into_iter().collect();
        self.phase = Phase::Focus;
        self.remaining_secs = self.settings.work_secs();
        events.push(Event::TimerReset { at: Utc::now() });
        events.push(self.snapshot());
        events
    }

    /// Call once per elapsed second while running.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let mut events = vec![self.snapshot()];
        if self.remaining_secs == 0 {
            events.extend(self.complete_phase());
        }
        events
    }

    /// Finish the current phase: auto-pause, then load the opposite phase.
    pub fn complete_phase(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.pause().into_iter().collect();
        let finished = self.phase;
        events.push(Event::PhaseCompleted {
            phase: finished,
            duration_secs: self.total_secs(),
            cue: self.cue(SoundCue::Complete),
            at: Utc::now(),
        });

        self.phase = finished.flipped();
        self.remaining_secs = self.total_secs();
        debug!(from = ?finished, to = ?self.phase, "phase changed");

        events.push(Event::PhaseChanged {
            from: finished,
            to: self.phase,
            label: self.phase.label().to_string(),
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        });
        events.push(self.snapshot());
        events
    }

    pub fn toggle_sound(&mut self) -> Event {
        self.sound_enabled = !self.sound_enabled;
        Event::SoundToggled {
            enabled: self.sound_enabled,
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cue(&self, cue: SoundCue) -> Option<SoundCue> {
        self.sound_enabled.then_some(cue)
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

/// `mm:ss`, minutes unbounded (a 120-minute phase shows `120:00`).
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(work: i64, brk: i64) -> TimerEngine {
        TimerEngine::new(TimerSettings::clamped(work, brk))
    }

    #[test]
    fn start_pause_cycle() {
        let mut engine = TimerEngine::default();
        assert_eq!(engine.state(), TimerState::IdleFocus);

        assert!(engine.start().is_some());
        assert_eq!(engine.state(), TimerState::RunningFocus);
        assert!(engine.start().is_none(), "second start is a no-op");

        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), TimerState::IdleFocus);
        assert!(engine.pause().is_none(), "pause while idle is a no-op");
    }

    #[test]
    fn tick_is_ignored_while_idle() {
        let mut engine = engine(1, 1);
        assert!(engine.tick().is_empty());
        assert_eq!(engine.remaining_secs(), 60);
    }

    #[test]
    fn focus_runs_out_into_idle_break() {
        let mut engine = engine(2, 3);
        engine.start();
        for _ in 0..119 {
            engine.tick();
        }
        assert_eq!(engine.remaining_secs(), 1);
        assert!(engine.is_running());

        let events = engine.tick();
        assert_eq!(engine.state(), TimerState::IdleBreak);
        assert_eq!(engine.remaining_secs(), 3 * 60);

        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                Event::StateSnapshot { .. } => "snapshot",
                Event::TimerPaused { .. } => "paused",
                Event::PhaseCompleted { .. } => "completed",
                Event::PhaseChanged { .. } => "changed",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, ["snapshot", "paused", "completed", "changed", "snapshot"]);
    }

    #[test]
    fn break_runs_out_into_idle_focus() {
        let mut engine = engine(1, 1);
        engine.complete_phase();
        assert_eq!(engine.phase(), Phase::Break);
        engine.start();
        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.state(), TimerState::IdleFocus);
        assert_eq!(engine.remaining_secs(), 60);
    }

    #[test]
    fn reset_restores_full_focus() {
        let mut engine = engine(10, 2);
        engine.complete_phase();
        engine.start();
        engine.tick();
        let events = engine.reset();
        assert_eq!(engine.state(), TimerState::IdleFocus);
        assert_eq!(engine.remaining_secs(), 600);
        assert!(matches!(events[0], Event::TimerPaused { .. }));
        assert!(events.last().is_some_and(Event::is_snapshot));
    }

    #[test]
    fn configure_reloads_only_when_idle() {
        let mut engine = engine(25, 5);
        engine.start();
        engine.tick();
        assert!(engine.configure(50, 10).is_empty());
        assert_eq!(engine.remaining_secs(), 25 * 60 - 1);

        engine.pause();
        let events = engine.configure(50, 10);
        assert_eq!(events.len(), 1);
        assert_eq!(engine.remaining_secs(), 50 * 60);
    }

    #[test]
    fn configure_clamps_in_break_phase() {
        let mut engine = engine(25, 5);
        engine.complete_phase();
        engine.configure(-3, 99);
        assert_eq!(engine.settings().work_minutes, 1);
        assert_eq!(engine.remaining_secs(), 30 * 60);
    }

    #[test]
    fn sound_toggle_gates_cues_only() {
        let mut engine = TimerEngine::default();
        let before = (engine.phase(), engine.remaining_secs());
        engine.toggle_sound();
        assert!(!engine.sound_enabled());
        assert_eq!(engine.start().and_then(|e| e.cue()), None);
        engine.pause();
        engine.toggle_sound();
        assert!(engine.sound_enabled());
        assert_eq!((engine.phase(), engine.remaining_secs()), before);
        assert_eq!(engine.start().and_then(|e| e.cue()), Some(SoundCue::Start));
    }

    #[test]
    fn snapshot_formats_display() {
        let engine = TimerEngine::default();
        match engine.snapshot() {
            Event::StateSnapshot {
                display,
                label,
                total_secs,
                ..
            } => {
                assert_eq!(display, "25:00");
                assert_eq!(label, "Focus Session");
                assert_eq!(total_secs, 1500);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(7200), "120:00");
    }
}
