use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

pub const TICK: Duration = Duration::from_secs(1);

/// Time source for the countdown loop.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Restarts the tick schedule so the next tick lands one period from now.
    fn restart(&mut self);

    async fn tick(&mut self);

    async fn sleep(&mut self, period: Duration);
}

pub struct SystemClock {
    interval: Option<Interval>,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { interval: None }
    }

    fn schedule() -> Interval {
        let mut interval = tokio::time::interval_at(Instant::now() + TICK, TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn restart(&mut self) {
        self.interval = Some(Self::schedule());
    }

    async fn tick(&mut self) {
        self.interval.get_or_insert_with(Self::schedule).tick().await;
    }

    async fn sleep(&mut self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}
