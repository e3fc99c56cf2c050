//! Deterministic stand-ins for the clock, terminal and notifier.

use crate::clock::Clock;
use crate::notify::{Alert, NotifyError, Notifier};
use crate::render::{Frame, Screen, Tone};
use chrono::{DateTime, Local, TimeZone};
use std::cell::RefCell;
use std::io;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Ticks instantly. Optionally cancels a token while delivering tick `n`.
pub struct ManualClock {
    pub ticks: u64,
    pub sleeps: Vec<Duration>,
    pub restarts: u32,
    cancel_on: Option<(u64, CancellationToken)>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            ticks: 0,
            sleeps: Vec::new(),
            restarts: 0,
            cancel_on: None,
        }
    }

    pub fn cancelling_at(tick: u64, token: CancellationToken) -> Self {
        ManualClock {
            cancel_on: Some((tick, token)),
            ..Self::new()
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 2, 9, 5, 0)
            .single()
            .unwrap_or_else(Local::now)
    }

    fn restart(&mut self) {
        self.restarts += 1;
    }

    async fn tick(&mut self) {
        self.ticks += 1;
        if let Some((n, token)) = &self.cancel_on {
            if *n == self.ticks {
                token.cancel();
            }
        }
    }

    async fn sleep(&mut self, period: Duration) {
        self.sleeps.push(period);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Drawn {
    Line(Tone, String),
    Progress(Frame),
    EndProgress,
}

#[derive(Default)]
pub struct RecordingScreen {
    pub drawn: Vec<Drawn>,
}

impl RecordingScreen {
    pub fn lines(&self) -> Vec<&str> {
        self.drawn
            .iter()
            .filter_map(|d| match d {
                Drawn::Line(_, text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn frames(&self) -> Vec<&Frame> {
        self.drawn
            .iter()
            .filter_map(|d| match d {
                Drawn::Progress(frame) => Some(frame),
                _ => None,
            })
            .collect()
    }
}

impl Screen for RecordingScreen {
    fn line(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        self.drawn.push(Drawn::Line(tone, text.to_string()));
        Ok(())
    }

    fn progress(&mut self, frame: &Frame) -> io::Result<()> {
        self.drawn.push(Drawn::Progress(frame.clone()));
        Ok(())
    }

    fn end_progress(&mut self) -> io::Result<()> {
        self.drawn.push(Drawn::EndProgress);
        Ok(())
    }
}

#[derive(Default)]
pub struct StubNotifier {
    pub fail: bool,
    pub sent: RefCell<Vec<Alert>>,
}

impl StubNotifier {
    pub fn failing() -> Self {
        StubNotifier {
            fail: true,
            ..Default::default()
        }
    }
}

impl Notifier for StubNotifier {
    fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.sent.borrow_mut().push(alert.clone());
        if self.fail {
            Err(NotifyError("no notification daemon".to_string()))
        } else {
            Ok(())
        }
    }
}
