use crate::duration::Duration;
use std::num::NonZeroU32;

pub const DEFAULT_WORK_MINUTES: u64 = 25;
pub const DEFAULT_BREAK_MINUTES: u64 = 5;
pub const DEFAULT_SESSIONS: NonZeroU32 = NonZeroU32::new(4).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    Work,
    Break,
}

impl IntervalKind {
    pub fn label(self) -> &'static str {
        match self {
            IntervalKind::Work => "Work",
            IntervalKind::Break => "Break",
        }
    }
}

/// One countdown in the expanded plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSpec {
    pub kind: IntervalKind,
    pub duration: Duration,
    /// 1-based session this interval belongs to.
    pub session: u32,
}

impl IntervalSpec {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Validated input for a whole run. Durations are positive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPlan {
    pub work: Duration,
    pub brk: Duration,
    pub sessions: NonZeroU32,
}

impl Default for SessionPlan {
    fn default() -> Self {
        SessionPlan {
            work: Duration::from_minutes(DEFAULT_WORK_MINUTES),
            brk: Duration::from_minutes(DEFAULT_BREAK_MINUTES),
            sessions: DEFAULT_SESSIONS,
        }
    }
}

impl SessionPlan {
    /// Work, Break, Work, ... Work. No break after the last session.
    /// Produced lazily, one spec at a time.
    pub fn intervals(&self) -> impl Iterator<Item = IntervalSpec> + use<> {
        let SessionPlan { work, brk, sessions } = *self;
        let total = sessions.get();
        (1..=total).flat_map(move |session| {
            let work = IntervalSpec {
                kind: IntervalKind::Work,
                duration: work,
                session,
            };
            let rest = (session < total).then_some(IntervalSpec {
                kind: IntervalKind::Break,
                duration: brk,
                session,
            });
            std::iter::once(work).chain(rest)
        })
    }
}
