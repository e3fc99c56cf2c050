use std::io::{self, Write};
use std::num::NonZeroU32;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

use crate::duration::{Duration, DurationError, Number, classify};
use crate::plan::{DEFAULT_BREAK_MINUTES, DEFAULT_SESSIONS, DEFAULT_WORK_MINUTES, SessionPlan};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CountError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' must be greater than zero")]
    NotPositive(String),
    #[error("'{0}' must be a whole number")]
    NotWhole(String),
    #[error("'{0}' is too large")]
    TooLarge(String),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Invalid work minutes: {0}")]
    Work(DurationError),
    #[error("Invalid break minutes: {0}")]
    Break(DurationError),
    #[error("Invalid session count: {0}")]
    Sessions(CountError),
}

pub fn parse_work(input: &str) -> Result<Duration, InputError> {
    Duration::parse(input).map_err(InputError::Work)
}

pub fn parse_break(input: &str) -> Result<Duration, InputError> {
    Duration::parse(input).map_err(InputError::Break)
}

pub fn parse_sessions(input: &str) -> Result<NonZeroU32, InputError> {
    let input = input.trim();
    let owned = || input.to_string();

    let err = match classify(input) {
        Number::Positive(v) if v.fract() != 0.0 => CountError::NotWhole(owned()),
        Number::Positive(v) if v > f64::from(u32::MAX) => CountError::TooLarge(owned()),
        // whole and in range, so the cast is exact
        Number::Positive(v) => match NonZeroU32::new(v as u32) {
            Some(n) => return Ok(n),
            None => CountError::NotPositive(owned()),
        },
        Number::NotPositive => CountError::NotPositive(owned()),
        Number::NotANumber => CountError::NotANumber(owned()),
    };
    Err(InputError::Sessions(err))
}

/// Builds a plan from positional arguments; missing ones take defaults.
pub fn from_args(
    work: Option<&str>,
    brk: Option<&str>,
    sessions: Option<&str>,
) -> Result<SessionPlan, InputError> {
    let mut plan = SessionPlan::default();
    if let Some(w) = work {
        plan.work = parse_work(w)?;
    }
    if let Some(b) = brk {
        plan.brk = parse_break(b)?;
    }
    if let Some(s) = sessions {
        plan.sessions = parse_sessions(s)?;
    }
    Ok(plan)
}

#[derive(Debug, PartialEq)]
pub enum Prompted {
    Plan(SessionPlan),
    Cancelled,
}

/// Asks for each value in turn, re-asking until it parses. Empty input takes
/// the default. End of input or cancellation abandons the whole prompt.
pub async fn prompt_plan<R, W>(
    reader: &mut R,
    out: &mut W,
    cancel: &CancellationToken,
) -> io::Result<Prompted>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(work) = ask(reader, out, cancel, "Work minutes", DEFAULT_WORK_MINUTES, parse_work).await? else {
        return Ok(Prompted::Cancelled);
    };
    let Some(brk) = ask(reader, out, cancel, "Break minutes", DEFAULT_BREAK_MINUTES, parse_break).await? else {
        return Ok(Prompted::Cancelled);
    };
    let Some(sessions) = ask(reader, out, cancel, "Sessions", DEFAULT_SESSIONS, parse_sessions).await? else {
        return Ok(Prompted::Cancelled);
    };

    Ok(Prompted::Plan(SessionPlan { work, brk, sessions }))
}

async fn ask<R, W, T, D>(
    reader: &mut R,
    out: &mut W,
    cancel: &CancellationToken,
    question: &str,
    default: D,
    parse: fn(&str) -> Result<T, InputError>,
) -> io::Result<Option<T>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    D: std::fmt::Display,
{
    let default = default.to_string();
    loop {
        write!(out, "{question} [{default}]: ")?;
        out.flush()?;

        let mut line = String::new();
        let read = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(None),
            read = reader.read_line(&mut line) => read?,
        };
        if read == 0 {
            writeln!(out)?;
            return Ok(None);
        }

        let answer = match line.trim() {
            "" => default.as_str(),
            given => given,
        };
        match parse(answer) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => writeln!(out, "  {e}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn prompt(input: &str) -> (Prompted, String) {
        let mut reader = input.as_bytes();
        let mut out = Vec::new();
        let result = prompt_plan(&mut reader, &mut out, &CancellationToken::new())
            .await
            .unwrap();
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn args_default_to_25_5_4() {
        assert_eq!(from_args(None, None, None), Ok(SessionPlan::default()));
    }

    #[test]
    fn args_override_in_order() {
        let plan = from_args(Some("50"), Some("10"), None).unwrap();
        assert_eq!(plan.work.total_secs, 3000);
        assert_eq!(plan.brk.total_secs, 600);
        assert_eq!(plan.sessions.get(), 4);
    }

    #[test]
    fn negative_work_is_rejected() {
        let err = from_args(Some("-5"), None, None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid work minutes: '-5' must be greater than zero");
    }

    #[test]
    fn non_numeric_break_is_rejected() {
        let err = from_args(Some("25"), Some("abc"), None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid break minutes: 'abc' is not a number");
    }

    #[test]
    fn session_count_must_be_positive_integer() {
        assert_eq!(parse_sessions("3").unwrap().get(), 3);
        assert_eq!(parse_sessions("2.0").unwrap().get(), 2);
        assert_eq!(
            parse_sessions("0"),
            Err(InputError::Sessions(CountError::NotPositive("0".to_string())))
        );
        assert_eq!(
            parse_sessions("-2"),
            Err(InputError::Sessions(CountError::NotPositive("-2".to_string())))
        );
        assert_eq!(
            parse_sessions("2.5"),
            Err(InputError::Sessions(CountError::NotWhole("2.5".to_string())))
        );
        assert_eq!(
            parse_sessions("four"),
            Err(InputError::Sessions(CountError::NotANumber("four".to_string())))
        );
        assert_eq!(
            parse_sessions("5000000000"),
            Err(InputError::Sessions(CountError::TooLarge("5000000000".to_string())))
        );
    }

    #[test]
    fn numeric_fields_share_one_grammar() {
        for input in [".5", "1e1", "+2", "abc", "1e400", "-1", "0", ""] {
            let work = parse_work(input);
            let sessions = parse_sessions(input);
            let work_not_number = matches!(work, Err(InputError::Work(DurationError::NotANumber(_))));
            let count_not_number =
                matches!(sessions, Err(InputError::Sessions(CountError::NotANumber(_))));
            assert_eq!(work_not_number, count_not_number, "{input:?}");
            let work_not_positive =
                matches!(work, Err(InputError::Work(DurationError::NotPositive(_))));
            let count_not_positive =
                matches!(sessions, Err(InputError::Sessions(CountError::NotPositive(_))));
            assert_eq!(work_not_positive, count_not_positive, "{input:?}");
        }
        assert_eq!(parse_sessions("1e1").unwrap().get(), 10);
        assert_eq!(parse_sessions("+2").unwrap().get(), 2);
        assert_eq!(parse_work(".5").unwrap().total_secs, 30);
        assert_eq!(
            parse_sessions(".5"),
            Err(InputError::Sessions(CountError::NotWhole(".5".to_string())))
        );
    }

    #[tokio::test]
    async fn prompts_collect_three_values() {
        let (result, out) = prompt("50\n10\n2\n").await;
        let Prompted::Plan(plan) = result else {
            panic!("expected a plan");
        };
        assert_eq!(plan.work.total_secs, 3000);
        assert_eq!(plan.brk.total_secs, 600);
        assert_eq!(plan.sessions.get(), 2);
        assert_eq!(out, "Work minutes [25]: Break minutes [5]: Sessions [4]: ");
    }

    #[tokio::test]
    async fn empty_answers_take_defaults() {
        let (result, _) = prompt("\n\n\n").await;
        assert_eq!(result, Prompted::Plan(SessionPlan::default()));
    }

    #[tokio::test]
    async fn invalid_answers_are_asked_again() {
        let (result, out) = prompt("0\n25\n5\n1.5\n3\n").await;
        let Prompted::Plan(plan) = result else {
            panic!("expected a plan");
        };
        assert_eq!(plan.sessions.get(), 3);
        assert!(out.contains("Invalid work minutes: '0' must be greater than zero"));
        assert!(out.contains("Invalid session count: '1.5' must be a whole number"));
        assert_eq!(out.matches("Work minutes [25]:").count(), 2);
        assert_eq!(out.matches("Sessions [4]:").count(), 2);
    }

    #[tokio::test]
    async fn end_of_input_cancels() {
        let (result, _) = prompt("25\n").await;
        assert_eq!(result, Prompted::Cancelled);
    }

    #[tokio::test]
    async fn cancelled_token_stops_prompting() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut reader: &[u8] = b"25\n5\n4\n";
        let mut out = Vec::new();
        let result = prompt_plan(&mut reader, &mut out, &cancel).await.unwrap();
        assert_eq!(result, Prompted::Cancelled);
        assert_eq!(String::from_utf8(out).unwrap(), "Work minutes [25]: ");
    }
}
