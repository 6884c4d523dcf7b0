//! Error types shared by the harness.
//!
//! Two families live here. [`HarnessError`] covers broken test cases: a bad
//! decoding spec, an unknown expectation, a dump file that cannot be loaded.
//! These are fatal. [`DecodeError`] is what the decoder under test reports;
//! it never escapes as a Rust error, it is folded into a
//! [`RunOutcome`](crate::RunOutcome) and judged against the expectation.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration faults. Any of these aborts the run with a diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("invalid operand in step {token:?}")]
    InvalidOperand {
        token: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("empty step at position {0} is only allowed at the end of the decoding spec")]
    MisplacedTerminator(usize),

    #[error("step wants {requested} bytes but only {remaining} remain in the dump")]
    BufferOverrun { requested: usize, remaining: usize },

    #[error("unknown error name: {0:?}")]
    UnknownErrorName(String),

    #[error("BSY cannot be expected, the codec busy state is not reachable from a dump")]
    BusyExpectation,

    #[error("cannot write the header list: {0}")]
    Output(#[source] std::io::Error),

    #[error("{}: {source}", .path.display())]
    Dump {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// HPACK result names, as used by `--expect-error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Arg,
    Buf,
    Int,
    Idx,
    Len,
    Huf,
    Chr,
    Upd,
    Rsz,
    Oom,
    Bsy,
    Skp,
    Hdr,
    Rea,
    Big,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 15] = [
        ErrorKind::Arg,
        ErrorKind::Buf,
        ErrorKind::Int,
        ErrorKind::Idx,
        ErrorKind::Len,
        ErrorKind::Huf,
        ErrorKind::Chr,
        ErrorKind::Upd,
        ErrorKind::Rsz,
        ErrorKind::Oom,
        ErrorKind::Bsy,
        ErrorKind::Skp,
        ErrorKind::Hdr,
        ErrorKind::Rea,
        ErrorKind::Big,
    ];

    /// The three-letter name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Arg => "ARG",
            ErrorKind::Buf => "BUF",
            ErrorKind::Int => "INT",
            ErrorKind::Idx => "IDX",
            ErrorKind::Len => "LEN",
            ErrorKind::Huf => "HUF",
            ErrorKind::Chr => "CHR",
            ErrorKind::Upd => "UPD",
            ErrorKind::Rsz => "RSZ",
            ErrorKind::Oom => "OOM",
            ErrorKind::Bsy => "BSY",
            ErrorKind::Skp => "SKP",
            ErrorKind::Hdr => "HDR",
            ErrorKind::Rea => "REA",
            ErrorKind::Big => "BIG",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::Arg => "invalid argument",
            ErrorKind::Buf => "buffer overflow",
            ErrorKind::Int => "integer overflow",
            ErrorKind::Idx => "invalid index",
            ErrorKind::Len => "invalid length",
            ErrorKind::Huf => "invalid Huffman code",
            ErrorKind::Chr => "invalid character",
            ErrorKind::Upd => "spurious update",
            ErrorKind::Rsz => "missing resize update",
            ErrorKind::Oom => "out of memory",
            ErrorKind::Bsy => "codec busy",
            ErrorKind::Skp => "message skipped",
            ErrorKind::Hdr => "undefined pseudo-header",
            ErrorKind::Rea => "missing realloc function",
            ErrorKind::Big => "header too big",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| HarnessError::UnknownErrorName(s.to_string()))
    }
}

/// A failure reported by the decoder under test.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ({}): {detail}", .kind.description())]
pub struct DecodeError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl DecodeError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
