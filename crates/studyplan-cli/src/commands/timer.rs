//! Foreground Pomodoro countdown.
//!
//! Reads one-letter commands from stdin while the driver ticks:
//! `s` start, `p` pause, `r` reset, `m` toggle sound, `q` quit.

use std::io::Write;

use chrono::Utc;
use clap::Subcommand;
use studyplan_core::api::SessionKind;
use studyplan_core::{
    ApiClient, Event, LocalStore, Phase, Preset, TimerDriver, TimerEngine, TimerSettings,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground
    Run {
        /// Focus minutes (1-120)
        #[arg(long)]
        work: Option<i64>,
        /// Break minutes (1-30)
        #[arg(long = "break")]
        brk: Option<i64>,
        /// quick (15/3), pomodoro (25/5) or long (50/10)
        #[arg(long)]
        preset: Option<Preset>,
        /// Silence the terminal bell
        #[arg(long)]
        no_sound: bool,
        /// Print every event as a JSON line
        #[arg(long)]
        json: bool,
    },
    /// List the built-in presets
    Presets,
}

pub async fn run(action: TimerAction) -> CmdResult {
    match action {
        TimerAction::Presets => {
            for preset in Preset::ALL {
                println!("{preset}");
            }
            Ok(())
        }
        TimerAction::Run {
            work,
            brk,
            preset,
            no_sound,
            json,
        } => {
            let ctx = Context::open()?;
            let base = preset
                .map(Preset::settings)
                .unwrap_or_else(|| ctx.config.timer_settings());
            let settings = TimerSettings::clamped(
                work.unwrap_or(i64::from(base.work_minutes)),
                brk.unwrap_or(i64::from(base.break_minutes)),
            );
            let engine = TimerEngine::new(settings)
                .with_sound(ctx.config.timer.sound_enabled && !no_sound);

            let recorder = ctx.config.timer.record_sessions.then(|| Recorder::new(&ctx));
            let output = Output { json };
            run_loop(engine, output, recorder.as_ref(), &ctx.store).await
        }
    }
}

async fn run_loop(
    engine: TimerEngine,
    output: Output,
    recorder: Option<&Recorder>,
    store: &LocalStore,
) -> CmdResult {
    let (mut driver, mut events) = TimerDriver::new(engine);
    output.hint();
    output.show(&driver.snapshot())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            // Events queued by the previous command render before the next one runs.
            biased;
            Some(event) = events.recv() => {
                output.show(&event)?;
                if let Event::PhaseCompleted { phase, duration_secs, .. } = event {
                    if let Some(recorder) = recorder {
                        recorder.record(store, phase, duration_secs).await;
                    }
                    if !stdin_open {
                        break;
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(command) => match command.trim() {
                        "s" | "start" => {
                            driver.start();
                        }
                        "p" | "pause" => driver.pause(),
                        "r" | "reset" => driver.reset(),
                        "m" | "mute" | "sound" => driver.toggle_sound(),
                        "q" | "quit" => break,
                        "" => {}
                        other => eprintln!("\nunknown command '{other}' (s/p/r/m/q)"),
                    },
                    None => {
                        // Input closed: keep counting if running, else stop.
                        stdin_open = false;
                        if !driver.engine().is_running() {
                            break;
                        }
                    }
                }
            }
            else => break,
        }
    }

    output.finish();
    Ok(())
}

struct Output {
    json: bool,
}

impl Output {
    fn hint(&self) {
        if !self.json {
            eprintln!("commands: s=start p=pause r=reset m=sound q=quit");
        }
    }

    fn show(&self, event: &Event) -> CmdResult {
        if let Some(cue) = event.cue() {
            // One bell per beep; the terminal decides how it sounds.
            eprint!("{}", "\x07".repeat(cue.beeps().len()));
        }
        if self.json {
            println!("{}", serde_json::to_string(event)?);
            return Ok(());
        }

        let mut stdout = std::io::stdout();
        match event {
            Event::StateSnapshot {
                label,
                display,
                running,
                sound_enabled,
                ..
            } => {
                let status = if *running { "running" } else { "paused" };
                let sound = if *sound_enabled { "" } else { " (muted)" };
                write!(stdout, "\r{label:<14} {display}  {status}{sound}    ")?;
            }
            Event::TimerStarted { .. } | Event::TimerPaused { .. } => {}
            Event::TimerReset { .. } => writeln!(stdout, "\ntimer reset")?,
            Event::PhaseCompleted { phase, .. } => {
                writeln!(stdout, "\n{} complete!", phase.label())?
            }
            Event::PhaseChanged { label, .. } => writeln!(stdout, "next: {label} (press s)")?,
            Event::SoundToggled { enabled, .. } => {
                writeln!(stdout, "\nsound {}", if *enabled { "on" } else { "off" })?
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn finish(&self) {
        if !self.json {
            println!();
        }
    }
}

/// Logs finished phases locally and, when logged in, to the backend.
struct Recorder {
    client: Option<ApiClient>,
}

impl Recorder {
    fn new(ctx: &Context) -> Self {
        let client = match ctx.authed() {
            Ok((_, client)) => Some(client),
            Err(err) => {
                debug!(%err, "sessions recorded locally only");
                None
            }
        };
        Self { client }
    }

    async fn record(&self, store: &LocalStore, phase: Phase, duration_secs: u64) {
        let minutes = u32::try_from(duration_secs / 60).unwrap_or(u32::MAX);
        let now = Utc::now();
        if let Err(err) = store.record_phase(phase, minutes, now) {
            warn!(%err, "failed to record session locally");
        }
        let Some(client) = &self.client else {
            return;
        };
        let kind = match phase {
            Phase::Focus => SessionKind::Work,
            Phase::Break => SessionKind::Break,
        };
        if let Err(err) = client.record_session(kind, minutes, now).await {
            warn!(%err, "failed to post session");
        }
    }
}
