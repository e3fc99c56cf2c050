use chrono::{DateTime, Local, TimeDelta};
use std::io;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::notify::{Alert, Notifier};
use crate::plan::IntervalSpec;
use crate::render::{Frame, Progress, Screen, Tone, format_clock};

/// Gap after an interval completes, before the next one starts.
pub const SETTLE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Completed,
    Cancelled,
}

/// Countdown state for the interval currently on screen.
#[derive(Debug, Clone)]
pub struct IntervalState {
    total_secs: u64,
    remaining_secs: u64,
    started_at: DateTime<Local>,
    phase: Phase,
}

impl IntervalState {
    pub fn new(total_secs: u64, started_at: DateTime<Local>) -> Self {
        IntervalState {
            total_secs,
            remaining_secs: total_secs,
            started_at,
            phase: Phase::Idle,
        }
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Running;
        }
    }

    /// Counts down one second. Completes on the tick after reaching zero.
    pub fn tick(&mut self) -> Phase {
        if self.phase == Phase::Running {
            match self.remaining_secs.checked_sub(1) {
                Some(left) => self.remaining_secs = left,
                None => self.phase = Phase::Completed,
            }
        }
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn progress(&self, bar_width: usize) -> Progress {
        Progress::compute(self.total_secs - self.remaining_secs, self.total_secs, bar_width)
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn ends_at(&self) -> Option<DateTime<Local>> {
        let secs = i64::try_from(self.total_secs).ok()?;
        self.started_at.checked_add_signed(TimeDelta::try_seconds(secs)?)
    }
}

/// Everything a running interval touches outside its own state.
pub struct Env<C, S, N> {
    pub clock: C,
    pub screen: S,
    pub notifier: N,
    pub cancel: CancellationToken,
    pub bar_width: usize,
}

pub async fn run<C, S, N>(spec: &IntervalSpec, env: &mut Env<C, S, N>) -> io::Result<TimerOutcome>
where
    C: Clock,
    S: Screen,
    N: Notifier,
{
    let label = spec.label();
    let mut state = IntervalState::new(spec.duration.total_secs, env.clock.now());

    env.screen.line(Tone::Plain, "")?;
    env.screen
        .line(Tone::Plain, &format!("\u{23F3} {label} session started ({})", spec.duration))?;
    env.screen.line(
        Tone::Plain,
        &format!("Started at: {}", format_clock(&state.started_at())),
    )?;
    if let Some(ends) = state.ends_at() {
        env.screen
            .line(Tone::Plain, &format!("Ends at: {}", format_clock(&ends)))?;
    }
    tracing::debug!(label, total_secs = spec.duration.total_secs, "interval started");

    env.clock.restart();
    state.start();

    loop {
        tokio::select! {
            biased;
            () = env.cancel.cancelled() => {}
            () = env.clock.tick() => {}
        }
        if env.cancel.is_cancelled() {
            env.screen.end_progress()?;
            tracing::info!(label, remaining_secs = state.remaining_secs(), "interval cancelled");
            return Ok(TimerOutcome::Cancelled);
        }

        env.screen
            .progress(&Frame::new(&state.progress(env.bar_width)))?;

        if state.tick() == Phase::Completed {
            break;
        }
    }

    env.screen.end_progress()?;
    env.screen
        .line(Tone::Success, &format!("\u{2713} {label} Complete!"))?;
    tracing::debug!(label, "interval complete");

    if let Err(e) = env.notifier.send(&Alert::interval_finished(label)) {
        tracing::warn!(error = %e, "falling back to console alert");
        env.screen.line(Tone::Plain, "\u{1F514} Time's up!")?;
    }

    tokio::select! {
        biased;
        () = env.cancel.cancelled() => return Ok(TimerOutcome::Cancelled),
        () = env.clock.sleep(SETTLE) => {}
    }

    Ok(TimerOutcome::Completed)
}
