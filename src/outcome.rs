//! Outcome reconciliation: does what happened match what the test case said
//! would happen?

use std::fmt;
use std::str::FromStr;

use crate::error::{ErrorKind, HarnessError};
use crate::machine::RunOutcome;

/// The expected result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expectation {
    #[default]
    Ok,
    Error(ErrorKind),
}

impl Expectation {
    /// Parse `OK` or an error name. `BSY` is refused.
    pub fn parse(s: &str) -> Result<Self, HarnessError> {
        if s == "OK" {
            return Ok(Expectation::Ok);
        }
        match s.parse::<ErrorKind>()? {
            ErrorKind::Bsy => Err(HarnessError::BusyExpectation),
            kind => Ok(Expectation::Error(kind)),
        }
    }
}

impl FromStr for Expectation {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Ok => f.write_str("OK"),
            Expectation::Error(kind) => write!(f, "{}", kind),
        }
    }
}

/// What the harness should do with the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The outcome matched. Headers are printed only for a successful decode.
    Pass { render_headers: bool },
    /// The outcome did not match.
    Fail { expected: Expectation, actual: String },
    /// An abort step fired; the process must die abnormally.
    Abort,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }
}

pub fn reconcile(outcome: &RunOutcome, expectation: Expectation) -> Verdict {
    match (outcome, expectation) {
        (RunOutcome::Aborted, _) => Verdict::Abort,
        (RunOutcome::Success, Expectation::Ok) => Verdict::Pass {
            render_headers: true,
        },
        (RunOutcome::DecodeError(err), Expectation::Error(kind)) if err.kind == kind => {
            Verdict::Pass {
                render_headers: false,
            }
        }
        (outcome, expected) => Verdict::Fail {
            expected,
            actual: outcome.to_string(),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
