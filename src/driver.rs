//! Harness driver: load the dump, run the decoder, report.

use std::fs::File;
use std::io::{self, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::{debug, info, warn};

use crate::error::HarnessError;
use crate::hpack::{HeaderField, HpackDecoder, DEFAULT_TABLE_SIZE, MAX_HEADER_BLOCK_SIZE};
use crate::machine::{self, RunReport};
use crate::outcome::{self, Expectation, Verdict};
use crate::spec::DecodingSpec;

/// Everything needed for one run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub spec: DecodingSpec,
    pub expectation: Expectation,
    pub table_size: u32,
    pub max_block_size: usize,
    pub dump: PathBuf,
}

impl HarnessConfig {
    pub fn new(dump: impl Into<PathBuf>) -> Self {
        Self {
            spec: DecodingSpec::default(),
            expectation: Expectation::Ok,
            table_size: DEFAULT_TABLE_SIZE,
            max_block_size: MAX_HEADER_BLOCK_SIZE,
            dump: dump.into(),
        }
    }
}

/// Read-only view of the dump file.
#[derive(Debug)]
pub enum DumpBytes {
    Mapped(Mmap),
    /// Zero-length files cannot be mapped portably.
    Empty,
}

impl DumpBytes {
    pub fn open(path: &Path) -> Result<Self, HarnessError> {
        let dump_err = |source: io::Error| HarnessError::Dump {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(dump_err)?;
        let len = file.metadata().map_err(dump_err)?.len();
        if len == 0 {
            return Ok(DumpBytes::Empty);
        }
        // SAFETY: the mapping is read-only and private to this process. The
        // dump is test data nobody is expected to modify during a run.
        let map = unsafe { Mmap::map(&file) }.map_err(dump_err)?;
        Ok(DumpBytes::Mapped(map))
    }
}

impl Deref for DumpBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            DumpBytes::Mapped(map) => &map[..],
            DumpBytes::Empty => &[],
        }
    }
}

/// Map the dump and run the decoding spec against a fresh decoder.
///
/// The mapping is released before returning.
pub fn run(config: &HarnessConfig) -> Result<RunReport, HarnessError> {
    let dump = DumpBytes::open(&config.dump)?;
    info!(
        dump = %config.dump.display(),
        len = dump.len(),
        spec = %config.spec,
        table_size = config.table_size,
        "decoding"
    );

    let mut decoder =
        HpackDecoder::new(config.table_size).with_max_block_size(config.max_block_size);
    let report = machine::run(&mut decoder, &config.spec, &dump)?;
    debug!(outcome = %report.outcome, fields = report.headers.len(), "run complete");
    Ok(report)
}

/// Hold the report against the configured expectation.
pub fn judge(config: &HarnessConfig, report: &RunReport) -> Verdict {
    let verdict = outcome::reconcile(&report.outcome, config.expectation);
    if let Verdict::Fail { expected, actual } = &verdict {
        match report.outcome.error() {
            Some(err) => warn!("hpack error: expected '{}' got '{}' ({})", expected, actual, err),
            None => warn!("hpack error: expected '{}' got '{}'", expected, actual),
        }
    }
    verdict
}

/// Print a decoded header list.
pub fn write_header_list<W: Write>(mut out: W, headers: &[HeaderField]) -> io::Result<()> {
    out.write_all(b"Decoded header list:\n\n")?;
    for field in headers {
        writeln!(out, "{}: {}", field.name, field.value)?;
    }
    writeln!(out)?;
    out.flush()
}

// ============================================================================
// Tests
// ============================================================================
