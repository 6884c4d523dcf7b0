//! Decoding spec parser.
//!
//! A decoding spec tells the harness how to cut the dump into writes:
//!
//! ```text
//! p5,d3,r0,
//! ```
//!
//! Steps are separated by commas. Each step is a one-letter command followed
//! by a decimal operand:
//!
//! - `a` - abort the decoding process
//! - `d<len>` - decode `len` bytes and finish the header block
//! - `p<len>` - decode `len` bytes of a partial block
//! - `r<size>` - resize the allowed dynamic table to `size` bytes
//!
//! An empty step ends the list. Whatever is left of the dump is always fed to
//! the decoder once the explicit steps are done.

use std::fmt;
use std::str::FromStr;

use crate::error::HarnessError;

/// Separator between steps.
pub const STEP_DELIMITER: char = ',';

/// One instruction of a decoding spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Write `len` bytes, then finish the header block.
    Decode(usize),
    /// Write `len` bytes and leave the header block open.
    PartialDecode(usize),
    /// Change the maximum dynamic table size the decoder accepts.
    Resize(u32),
    /// Bring the whole process down.
    Abort,
}

impl Step {
    /// Parse a single non-empty token.
    pub fn parse(token: &str) -> Result<Self, HarnessError> {
        let mut chars = token.chars();
        let command = match chars.next() {
            Some(c) => c,
            None => return Err(HarnessError::UnknownCommand(String::new())),
        };
        let operand = chars.as_str();

        match command {
            'a' => {
                if !operand.is_empty() {
                    parse_operand::<u64>(token, operand)?;
                }
                Ok(Step::Abort)
            }
            'd' => Ok(Step::Decode(parse_operand(token, operand)?)),
            'p' => Ok(Step::PartialDecode(parse_operand(token, operand)?)),
            'r' => Ok(Step::Resize(parse_operand(token, operand)?)),
            _ => Err(HarnessError::UnknownCommand(token.to_string())),
        }
    }

    /// Number of dump bytes this step consumes.
    pub fn consumed(&self) -> usize {
        match *self {
            Step::Decode(len) | Step::PartialDecode(len) => len,
            Step::Resize(_) | Step::Abort => 0,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Decode(len) => write!(f, "d{}", len),
            Step::PartialDecode(len) => write!(f, "p{}", len),
            Step::Resize(size) => write!(f, "r{}", size),
            Step::Abort => f.write_str("a"),
        }
    }
}

// Older spec strings doubled the separator inside an operand; one occurrence
// is dropped before the number is read.
fn parse_operand<T: FromStr<Err = std::num::ParseIntError>>(
    token: &str,
    operand: &str,
) -> Result<T, HarnessError> {
    let normalized = operand.replacen(STEP_DELIMITER, "", 1);
    normalized
        .parse::<T>()
        .map_err(|source| HarnessError::InvalidOperand {
            token: token.to_string(),
            source,
        })
}

/// The ordered list of steps read from a spec string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodingSpec {
    steps: Vec<Step>,
}

impl DecodingSpec {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Parse a full spec string.
    ///
    /// The empty string is a valid spec with no explicit steps. An empty
    /// token anywhere but in last position is rejected.
    pub fn parse(spec: &str) -> Result<Self, HarnessError> {
        let tokens: Vec<&str> = spec.split(STEP_DELIMITER).collect();
        let last = tokens.len() - 1;
        let mut steps = Vec::with_capacity(tokens.len());

        for (position, token) in tokens.iter().enumerate() {
            if token.is_empty() {
                if position != last {
                    return Err(HarnessError::MisplacedTerminator(position));
                }
                break;
            }
            steps.push(Step::parse(token)?);
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Bytes consumed by the explicit steps, before the final feed. Saturates.
    pub fn explicit_len(&self) -> usize {
        self.steps
            .iter()
            .map(Step::consumed)
            .fold(0, usize::saturating_add)
    }
}

impl FromStr for DecodingSpec {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DecodingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
