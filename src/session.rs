use std::io;

use crate::clock::Clock;
use crate::notify::Notifier;
use crate::plan::{IntervalKind, SessionPlan};
use crate::render::{Screen, Tone};
use crate::timer::{self, Env, TimerOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Cancelled,
}

/// Runs every interval of `plan` in order, one at a time.
pub async fn run_session<C, S, N>(plan: &SessionPlan, env: &mut Env<C, S, N>) -> io::Result<SessionOutcome>
where
    C: Clock,
    S: Screen,
    N: Notifier,
{
    let total = plan.sessions.get();

    show_banner(plan, &mut env.screen)?;
    tracing::info!(
        work_secs = plan.work.total_secs,
        break_secs = plan.brk.total_secs,
        sessions = total,
        "session started"
    );

    for spec in plan.intervals() {
        if spec.kind == IntervalKind::Work {
            env.screen.line(
                Tone::Accent,
                &format!("=== Session {}/{total} ===", spec.session),
            )?;
        }

        if timer::run(&spec, env).await? == TimerOutcome::Cancelled {
            tracing::info!(session = spec.session, label = spec.label(), "session cancelled");
            return Ok(SessionOutcome::Cancelled);
        }
    }

    env.screen.line(Tone::Plain, "")?;
    env.screen.line(Tone::Accent, &summary(total))?;
    Ok(SessionOutcome::Completed)
}

fn show_banner<S: Screen>(plan: &SessionPlan, screen: &mut S) -> io::Result<()> {
    screen.line(Tone::Accent, "\u{1F345} Pomodoro Timer Starting")?;
    screen.line(
        Tone::Plain,
        &format!(
            "Work: {} | Break: {} | Sessions: {}",
            plan.work.format_short(),
            plan.brk.format_short(),
            plan.sessions
        ),
    )?;
    screen.line(Tone::Plain, "Press Ctrl+C to stop at any time")?;
    screen.line(Tone::Plain, "")
}

fn summary(total: u32) -> String {
    if total == 1 {
        "\u{1F389} 1 session complete! Great work!".to_string()
    } else {
        format!("\u{1F389} All {total} sessions complete! Great work!")
    }
}
