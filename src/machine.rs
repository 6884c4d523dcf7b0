//! Decode step machine.
//!
//! Drives a [`HeaderDecoder`] through the steps of a [`DecodingSpec`], slicing
//! the dump as it goes. The first decode error ends the run; the steps after
//! it never execute.

use std::fmt;

use tracing::debug;

use crate::buffer::InputBuffer;
use crate::error::{DecodeError, HarnessError};
use crate::hpack::{HeaderDecoder, HeaderField};
use crate::spec::{DecodingSpec, Step};

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    DecodeError(DecodeError),
    Aborted,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            RunOutcome::DecodeError(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => f.write_str("OK"),
            RunOutcome::DecodeError(err) => write!(f, "{}", err.kind),
            RunOutcome::Aborted => f.write_str("abort"),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Fields in decode order, including those of a block that later failed.
    pub headers: Vec<HeaderField>,
    /// Explicit steps that were executed, the failing one included.
    pub steps_run: usize,
}

/// Feeds a dump to a decoder according to a decoding spec.
#[derive(Debug)]
pub struct StepMachine<'a, D> {
    decoder: &'a mut D,
    buffer: InputBuffer<'a>,
    headers: Vec<HeaderField>,
    steps_run: usize,
}

impl<'a, D: HeaderDecoder> StepMachine<'a, D> {
    pub fn new(decoder: &'a mut D, dump: &'a [u8]) -> Self {
        Self {
            decoder,
            buffer: InputBuffer::new(dump),
            headers: Vec::new(),
            steps_run: 0,
        }
    }

    /// Run every step, then feed the rest of the dump and finalize once.
    ///
    /// Decoder failures end up in the report. Only configuration faults,
    /// such as a step reading past the end of the dump, are returned as
    /// errors.
    pub fn run(mut self, spec: &DecodingSpec) -> Result<RunReport, HarnessError> {
        for step in spec.steps() {
            self.steps_run += 1;
            debug!(step = %step, offset = self.buffer.consumed(), "executing step");

            let result = match *step {
                Step::Abort => return Ok(self.finish(RunOutcome::Aborted)),
                Step::Decode(len) => {
                    let bytes = self.buffer.take(len)?;
                    self.decode(bytes, true)
                }
                Step::PartialDecode(len) => {
                    let bytes = self.buffer.take(len)?;
                    self.decode(bytes, false)
                }
                Step::Resize(size) => {
                    self.decoder.set_max_allowed_table_size(size);
                    Ok(())
                }
            };

            if let Err(err) = result {
                debug!(step = %step, error = %err, "step failed, skipping the rest");
                return Ok(self.finish(RunOutcome::DecodeError(err)));
            }
        }

        let rest = self.buffer.take_rest();
        debug!(len = rest.len(), "feeding the rest of the dump");
        let outcome = match self.decode(rest, true) {
            Ok(()) => RunOutcome::Success,
            Err(err) => RunOutcome::DecodeError(err),
        };
        Ok(self.finish(outcome))
    }

    fn decode(&mut self, bytes: &[u8], finalize: bool) -> Result<(), DecodeError> {
        self.decoder.write(bytes, &mut self.headers)?;
        if finalize {
            self.decoder.finalize(&mut self.headers)?;
        }
        Ok(())
    }

    fn finish(self, outcome: RunOutcome) -> RunReport {
        RunReport {
            outcome,
            headers: self.headers,
            steps_run: self.steps_run,
        }
    }
}

/// Convenience wrapper around [`StepMachine`].
pub fn run<D: HeaderDecoder>(
    decoder: &mut D,
    spec: &DecodingSpec,
    dump: &[u8],
) -> Result<RunReport, HarnessError> {
    StepMachine::new(decoder, dump).run(spec)
}

// ============================================================================
// Tests
// ============================================================================
