//! Timer state machine invariants driven through the public API.

use proptest::prelude::*;
use studyplan_core::timer::{SoundCue, MAX_BREAK_MINUTES, MAX_WORK_MINUTES};
use studyplan_core::{Event, Phase, Preset, TimerEngine, TimerSettings, TimerState};

fn engine(work: i64, brk: i64) -> TimerEngine {
    TimerEngine::new(TimerSettings::clamped(work, brk))
}

proptest! {
    #[test]
    fn configure_always_lands_in_range(work in -500i64..500, brk in -500i64..500) {
        let mut timer = TimerEngine::default();
        timer.configure(work, brk);
        let settings = timer.settings();
        prop_assert!((1..=MAX_WORK_MINUTES).contains(&settings.work_minutes));
        prop_assert!((1..=MAX_BREAK_MINUTES).contains(&settings.break_minutes));
        prop_assert_eq!(timer.remaining_secs(), u64::from(settings.work_minutes) * 60);
    }

    #[test]
    fn reset_always_restores_full_focus(
        work in 1i64..=120,
        brk in 1i64..=30,
        ticks in 0u64..10_000,
        start_again in any::<bool>(),
    ) {
        let mut timer = engine(work, brk);
        timer.start();
        for _ in 0..ticks {
            if !timer.is_running() && start_again {
                timer.start();
            }
            timer.tick();
        }
        timer.reset();
        prop_assert_eq!(timer.state(), TimerState::IdleFocus);
        prop_assert_eq!(timer.remaining_secs(), work as u64 * 60);
    }

    #[test]
    fn remaining_never_exceeds_phase_length(work in 1i64..=5, brk in 1i64..=5, ticks in 0u64..2_000) {
        let mut timer = engine(work, brk);
        for _ in 0..ticks {
            timer.start();
            timer.tick();
            prop_assert!(timer.remaining_secs() <= timer.total_secs());
            prop_assert!(timer.remaining_secs() > 0);
        }
    }
}

#[test]
fn full_focus_phase_lands_in_idle_break() {
    let mut timer = Preset::Quick.settings();
    timer.work_minutes = 2;
    let mut timer = TimerEngine::new(timer);
    timer.start();

    let mut completions = 0;
    for _ in 0..120 {
        for event in timer.tick() {
            if let Event::PhaseCompleted { phase, cue, .. } = event {
                assert_eq!(phase, Phase::Focus);
                assert_eq!(cue, Some(SoundCue::Complete));
                completions += 1;
            }
        }
    }

    assert_eq!(completions, 1);
    assert_eq!(timer.state(), TimerState::IdleBreak);
    assert_eq!(timer.remaining_secs(), 3 * 60);
    assert!(timer.tick().is_empty());
}

#[test]
fn sound_toggle_twice_changes_nothing_but_cues() {
    let mut timer = TimerEngine::default();
    timer.start();
    timer.tick();
    let before = (timer.state(), timer.remaining_secs());

    timer.toggle_sound();
    let paused = timer.pause().unwrap();
    assert_eq!(paused.cue(), None);
    timer.start();
    timer.toggle_sound();

    assert!(timer.sound_enabled());
    assert_eq!((timer.state(), timer.remaining_secs()), before);
}

#[test]
fn events_serialize_with_type_tag() {
    let mut timer = TimerEngine::default();
    let started = timer.start().unwrap();
    let json = serde_json::to_value(&started).unwrap();
    assert_eq!(json["type"], "timer_started");
    assert_eq!(json["remaining_secs"], 1500);

    let snapshot = serde_json::to_value(timer.snapshot()).unwrap();
    assert_eq!(snapshot["display"], "25:00");
    assert_eq!(snapshot["label"], "Focus Session");
}
