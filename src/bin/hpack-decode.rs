//! Decode an HPACK dump according to a decoding spec and check the result.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use hpack_harness::driver::{self, HarnessConfig};
use hpack_harness::{
    DecodingSpec, ErrorKind, Expectation, HarnessError, Verdict, DEFAULT_TABLE_SIZE,
    MAX_HEADER_BLOCK_SIZE,
};
use tracing::{error, Level};

const SPEC_HELP: &str = "\
Spec format: <letter><size>
  a - abort the decoding process
  d - decode a block of <size> bytes from the dump
  p - decode a partial block of <size> bytes
  r - resize the dynamic table to <size> bytes
  The last empty spec decodes the rest of the dump";

#[derive(Parser, Debug)]
#[command(
    name = "hpack-decode",
    version,
    about = "Decode a dump of HPACK octets",
    after_help = after_help()
)]
struct Cli {
    /// Comma separated decoding steps
    #[arg(long = "decoding-spec", value_name = "SPEC", default_value = "")]
    decoding_spec: String,

    /// Expected result: OK or an error name
    #[arg(long = "expect-error", value_name = "ERR", default_value = "OK")]
    expect_error: String,

    /// Dynamic table size
    #[arg(long = "table-size", value_name = "SIZE", default_value_t = DEFAULT_TABLE_SIZE)]
    table_size: u32,

    /// Largest header block accepted across partial writes
    #[arg(long = "max-block-size", value_name = "BYTES", default_value_t = MAX_HEADER_BLOCK_SIZE)]
    max_block_size: usize,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,

    /// File containing a dump of HPACK octets
    dump: PathBuf,
}

fn after_help() -> String {
    let mut help = format!("{}\n\nPossible errors:\n", SPEC_HELP);
    for kind in ErrorKind::ALL {
        if kind != ErrorKind::Bsy {
            help.push_str(&format!("  {}: {}\n", kind, kind.description()));
        }
    }
    help
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();
}

fn execute(cli: &Cli) -> Result<ExitCode, HarnessError> {
    // Both are checked before the dump is even opened
    let expectation = Expectation::parse(&cli.expect_error)?;
    let spec = DecodingSpec::parse(&cli.decoding_spec)?;

    let config = HarnessConfig {
        spec,
        expectation,
        table_size: cli.table_size,
        max_block_size: cli.max_block_size,
        dump: cli.dump.clone(),
    };
    let report = driver::run(&config)?;

    match driver::judge(&config, &report) {
        Verdict::Pass { render_headers } => {
            if render_headers {
                driver::write_header_list(io::stdout().lock(), &report.headers)
                    .map_err(HarnessError::Output)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Verdict::Fail { .. } => Ok(ExitCode::FAILURE),
        Verdict::Abort => {
            error!("abort step reached");
            std::process::abort()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match execute(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
