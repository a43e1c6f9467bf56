//! Once-per-second tick source for a [`TimerEngine`].
//!
//! The driver owns at most one tick registration (a spawned tokio task). The
//! registration is released on pause, reset and drop, and the task exits on
//! its own once a phase completes, since completion auto-pauses the engine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::engine::TimerEngine;
use crate::events::Event;

const TICK_PERIOD: Duration = Duration::from_secs(1);

type SharedEngine = Arc<Mutex<TimerEngine>>;

/// Cancellable tick registration. Dropping it aborts the task.
#[derive(Debug)]
pub struct TickHandle {
    task: JoinHandle<()>,
}

impl TickHandle {
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Session-scoped owner of a timer engine and its tick source.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TimerDriver {
    engine: SharedEngine,
    events: mpsc::UnboundedSender<Event>,
    tick: Option<TickHandle>,
}

impl TimerDriver {
    /// Wrap `engine`; every event it produces is delivered on the returned receiver.
    pub fn new(engine: TimerEngine) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (events, rx) = mpsc::unbounded_channel();
        let driver = Self {
            engine: Arc::new(Mutex::new(engine)),
            events,
            tick: None,
        };
        (driver, rx)
    }

    /// Copy of the engine's current state.
    pub fn engine(&self) -> TimerEngine {
        lock(&self.engine).clone()
    }

    pub fn snapshot(&self) -> Event {
        lock(&self.engine).snapshot()
    }

    /// True while a tick registration is alive.
    pub fn is_ticking(&self) -> bool {
        self.tick.as_ref().is_some_and(TickHandle::is_active)
    }

    /// Start counting down. Returns false if the timer was already running.
    pub fn start(&mut self) -> bool {
        let Some(event) = lock(&self.engine).start() else {
            return false;
        };
        self.emit([event]);
        // Any previous handle belongs to a finished phase; replace it.
        self.tick = Some(spawn_ticker(
            Arc::clone(&self.engine),
            self.events.clone(),
            TICK_PERIOD,
        ));
        true
    }

    pub fn pause(&mut self) {
        self.cancel_tick();
        let event = lock(&self.engine).pause();
        self.emit(event);
    }

    pub fn reset(&mut self) {
        self.cancel_tick();
        let events = lock(&self.engine).reset();
        self.emit(events);
    }

    pub fn configure(&mut self, work_minutes: i64, break_minutes: i64) {
        let events = lock(&self.engine).configure(work_minutes, break_minutes);
        self.emit(events);
    }

    pub fn toggle_sound(&mut self) {
        let event = lock(&self.engine).toggle_sound();
        self.emit([event]);
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick.take() {
            debug!("cancelling tick registration");
            drop(handle);
        }
    }

    fn emit(&self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            // Receiver gone means nobody is rendering; nothing to do.
            let _ = self.events.send(event);
        }
    }
}

fn spawn_ticker(
    engine: SharedEngine,
    events: mpsc::UnboundedSender<Event>,
    period: Duration,
) -> TickHandle {
    let task = tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let (batch, finished) = {
                let mut engine = lock(&engine);
                if !engine.is_running() {
                    break;
                }
                let batch = engine.tick();
                (batch, !engine.is_running())
            };
            trace!(events = batch.len(), "tick");
            for event in batch {
                if events.send(event).is_err() {
                    return;
                }
            }
            if finished {
                debug!("phase complete; tick task exiting");
                break;
            }
        }
    });
    TickHandle { task }
}

fn lock(engine: &SharedEngine) -> MutexGuard<'_, TimerEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Phase, TimerSettings, TimerState};

    fn driver(work: i64, brk: i64) -> (TimerDriver, mpsc::UnboundedReceiver<Event>) {
        TimerDriver::new(TimerEngine::new(TimerSettings::clamped(work, brk)))
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second() {
        let (mut driver, _rx) = driver(1, 1);
        assert!(driver.start());
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(driver.engine().remaining_secs(), 55);
        assert!(driver.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_keeps_single_registration() {
        let (mut driver, _rx) = driver(1, 1);
        assert!(driver.start());
        assert!(!driver.start());
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(driver.engine().remaining_secs(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_ticking() {
        let (mut driver, mut rx) = driver(1, 1);
        driver.start();
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        driver.pause();
        assert!(!driver.is_ticking());
        let frozen = driver.engine().remaining_secs();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(driver.engine().remaining_secs(), frozen);
        let events = drain(&mut rx);
        assert!(matches!(events.last(), Some(Event::TimerPaused { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn completion_flips_phase_and_releases_tick() {
        let (mut driver, mut rx) = driver(1, 2);
        driver.start();
        tokio::time::sleep(Duration::from_secs(65)).await;

        let engine = driver.engine();
        assert_eq!(engine.state(), TimerState::IdleBreak);
        assert_eq!(engine.remaining_secs(), 120);
        assert!(!driver.is_ticking());

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PhaseChanged { from: Phase::Focus, to: Phase::Break, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_run_returns_to_full_focus() {
        let (mut driver, _rx) = driver(2, 1);
        driver.start();
        tokio::time::sleep(Duration::from_millis(4_500)).await;
        driver.reset();
        tokio::time::sleep(Duration::from_secs(5)).await;
        let engine = driver.engine();
        assert_eq!(engine.state(), TimerState::IdleFocus);
        assert_eq!(engine.remaining_secs(), 120);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_completion_counts_new_phase() {
        let (mut driver, _rx) = driver(1, 1);
        driver.start();
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(driver.start());
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let engine = driver.engine();
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_secs(), 58);
    }
}
