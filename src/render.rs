use chrono::{DateTime, Local};
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

pub const BAR_WIDTH: usize = 20;

const FILLED: &str = "\u{2588}";
const EMPTY: &str = "\u{2591}";

/// Progress of one interval at a single tick. Pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub elapsed_secs: u64,
    pub remaining_secs: u64,
    pub total_secs: u64,
    /// Fraction done, clamped to `[0, 1]`.
    pub percent: f64,
    pub filled: usize,
    pub bar_width: usize,
}

impl Progress {
    pub fn compute(elapsed_secs: u64, total_secs: u64, bar_width: usize) -> Self {
        let elapsed_secs = elapsed_secs.min(total_secs);
        let percent = if total_secs == 0 {
            1.0
        } else {
            (elapsed_secs as f64 / total_secs as f64).min(1.0)
        };
        let filled = ((percent * bar_width as f64).floor() as usize).min(bar_width);
        Progress {
            elapsed_secs,
            remaining_secs: total_secs - elapsed_secs,
            total_secs,
            percent,
            filled,
            bar_width,
        }
    }

    /// Integer readout, 0–100.
    pub fn percent_readout(&self) -> u8 {
        (self.percent * 100.0).round() as u8
    }

    pub fn remaining_minutes(&self) -> u64 {
        self.remaining_secs.div_ceil(60)
    }
}

/// The text of one progress line, split so the terminal can color the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub filled: String,
    pub empty: String,
    pub readout: String,
    pub color: Color,
}

impl Frame {
    pub fn new(progress: &Progress) -> Self {
        Frame {
            filled: FILLED.repeat(progress.filled),
            empty: EMPTY.repeat(progress.bar_width - progress.filled),
            readout: format!(
                "{}% - {}m remaining",
                progress.percent_readout(),
                progress.remaining_minutes()
            ),
            color: bar_color(progress),
        }
    }
}

// Green, then yellow for the last 20%, red for the last minute.
fn bar_color(progress: &Progress) -> Color {
    if progress.remaining_secs <= 60 {
        Color::Red
    } else if progress.remaining_secs as f64 <= progress.total_secs as f64 * 0.2 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// `9:05AM`, `12:30PM`. Hour 0 reads as 12.
pub fn format_clock(at: &DateTime<Local>) -> String {
    at.format("%-I:%M%p").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Accent,
    Success,
}

/// Where the timer writes. Lines append; the progress line is redrawn in place.
pub trait Screen {
    fn line(&mut self, tone: Tone, text: &str) -> io::Result<()>;

    fn progress(&mut self, frame: &Frame) -> io::Result<()>;

    /// Moves past the progress line so the next `line` starts fresh.
    fn end_progress(&mut self) -> io::Result<()>;
}

pub struct TerminalScreen<W: Write> {
    out: W,
    in_progress: bool,
}

impl<W: Write> TerminalScreen<W> {
    pub fn new(out: W) -> Self {
        TerminalScreen {
            out,
            in_progress: false,
        }
    }
}

impl<W: Write> Screen for TerminalScreen<W> {
    fn line(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        self.end_progress()?;
        match tone {
            Tone::Plain => queue!(self.out, Print(text), Print("\n"))?,
            Tone::Accent | Tone::Success => {
                let color = if tone == Tone::Accent {
                    Color::Cyan
                } else {
                    Color::Green
                };
                queue!(
                    self.out,
                    SetForegroundColor(color),
                    Print(text),
                    ResetColor,
                    Print("\n"),
                )?;
            }
        }
        self.out.flush()
    }

    fn progress(&mut self, frame: &Frame) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print("["),
            SetForegroundColor(frame.color),
            Print(&frame.filled),
            SetForegroundColor(Color::DarkGrey),
            Print(&frame.empty),
            ResetColor,
            Print("] "),
            Print(&frame.readout),
        )?;
        self.in_progress = true;
        self.out.flush()
    }

    fn end_progress(&mut self) -> io::Result<()> {
        if self.in_progress {
            self.in_progress = false;
            queue!(self.out, Print("\n"))?;
            self.out.flush()?;
        }
        Ok(())
    }
}
