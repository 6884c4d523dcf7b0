//! hpack-harness: a deterministic driver for HPACK decoders
//!
//! This crate feeds a dump of HPACK octets to a decoder the way an HTTP/2
//! connection would: in slices, with header blocks sometimes split across
//! several writes, and with dynamic table size changes in between. A small
//! spec string says how to slice the dump; the run outcome is then compared
//! against an expected result.
//!
//! # Quick Start
//!
//! ```rust
//! use hpack_harness::{DecodingSpec, HpackDecoder, RunOutcome};
//!
//! // RFC 7541 C.3.1, fed as a partial block of 3 bytes then the rest
//! let dump = [
//!     0x82, 0x86, 0x84, 0x41, 0x0f, b'w', b'w', b'w', b'.', b'e',
//!     b'x', b'a', b'm', b'p', b'l', b'e', b'.', b'c', b'o', b'm',
//! ];
//! let spec: DecodingSpec = "p3".parse().unwrap();
//!
//! let mut decoder = HpackDecoder::new(4096);
//! let report = hpack_harness::machine::run(&mut decoder, &spec, &dump).unwrap();
//!
//! assert_eq!(report.outcome, RunOutcome::Success);
//! assert_eq!(report.headers[3].name, ":authority");
//! assert_eq!(report.headers[3].value, "www.example.com");
//! ```
//!
//! # Architecture
//!
//! - [`spec`]: decoding spec parser (`d`, `p`, `r`, `a` steps)
//! - [`buffer`]: prefix-consuming cursor over the dump
//! - [`machine`]: runs the steps against a [`HeaderDecoder`]
//! - [`outcome`]: compares the outcome with the expectation
//! - [`hpack`]: the `fluke-hpack` backed decoder
//! - [`driver`]: file mapping and output, used by the `hpack-decode` binary

pub mod buffer;
pub mod driver;
pub mod error;
pub mod hpack;
pub mod machine;
pub mod outcome;
pub mod spec;

pub use buffer::InputBuffer;
pub use driver::HarnessConfig;
pub use error::{DecodeError, ErrorKind, HarnessError};
pub use hpack::{HeaderDecoder, HeaderField, HpackDecoder, DEFAULT_TABLE_SIZE, MAX_HEADER_BLOCK_SIZE};
pub use machine::{RunOutcome, RunReport, StepMachine};
pub use outcome::{reconcile, Expectation, Verdict};
pub use spec::{DecodingSpec, Step};
