use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static COMPACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$").expect("compact duration pattern")
});

/// Longest accepted interval.
pub const MAX_SECS: u64 = u32::MAX as u64;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DurationError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' must be greater than zero")]
    NotPositive(String),
    #[error("'{0}' is too large")]
    TooLarge(String),
}

/// How a plain numeric answer reads. Every numeric field goes through this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Positive(f64),
    NotPositive,
    NotANumber,
}

pub fn classify(input: &str) -> Number {
    match input.trim().parse::<f64>() {
        Ok(v) if !v.is_finite() => Number::NotANumber,
        Ok(v) if v <= 0.0 => Number::NotPositive,
        Ok(v) => Number::Positive(v),
        Err(_) => Number::NotANumber,
    }
}

/// A positive length of time, whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    pub total_secs: u64,
}

impl Duration {
    pub fn from_minutes(minutes: u64) -> Self {
        Duration {
            total_secs: minutes * 60,
        }
    }

    /// Parses a minutes value: a plain number of minutes (`25`, `2.5`, `.5`)
    /// or a compact form (`1h30m`, `90s`).
    pub fn parse(input: &str) -> Result<Self, DurationError> {
        let input = input.trim();
        let too_large = || DurationError::TooLarge(input.to_string());

        if let Some(caps) = COMPACT.captures(input).filter(|_| !input.is_empty()) {
            let part = |i: usize| -> Result<u64, DurationError> {
                caps.get(i)
                    .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| too_large()))
            };
            let total_secs = part(1)?
                .checked_mul(3600)
                .and_then(|h| part(2).ok()?.checked_mul(60)?.checked_add(h))
                .and_then(|hm| part(3).ok()?.checked_add(hm))
                .ok_or_else(too_large)?;
            return Self::bounded(input, total_secs);
        }

        match classify(input) {
            Number::Positive(minutes) => {
                let secs = (minutes * 60.0).round();
                if secs > MAX_SECS as f64 {
                    return Err(too_large());
                }
                Self::bounded(input, secs as u64)
            }
            Number::NotPositive => Err(DurationError::NotPositive(input.to_string())),
            Number::NotANumber => Err(DurationError::NotANumber(input.to_string())),
        }
    }

    fn bounded(input: &str, total_secs: u64) -> Result<Self, DurationError> {
        match total_secs {
            0 => Err(DurationError::NotPositive(input.to_string())),
            s if s > MAX_SECS => Err(DurationError::TooLarge(input.to_string())),
            _ => Ok(Duration { total_secs }),
        }
    }

    pub fn format_hms(&self) -> String {
        let h = self.total_secs / 3600;
        let m = (self.total_secs % 3600) / 60;
        let s = self.total_secs % 60;

        if h > 0 {
            format!("{h}:{m:02}:{s:02}")
        } else {
            format!("{m}:{s:02}")
        }
    }

    /// Short form for the start banner: `25min`, or `1:30` when not whole minutes.
    pub fn format_short(&self) -> String {
        if self.total_secs % 60 == 0 {
            format!("{}min", self.total_secs / 60)
        } else {
            self.format_hms()
        }
    }
}

impl fmt::Display for Duration {
    /// `25 minutes`, `1 minute`, or `1:30` when not whole minutes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.total_secs {
            60 => write!(f, "1 minute"),
            s if s % 60 == 0 => write!(f, "{} minutes", s / 60),
            _ => write!(f, "{}", self.format_hms()),
        }
    }
}
