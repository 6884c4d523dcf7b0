//! End to end tests for the decoding harness

use std::path::PathBuf;


/// RFC 7541 C.3.1, one complete block.
#[rustfmt::skip]
pub const FIRST_REQUEST: [u8; 20] = [
    0x82, 0x86, 0x84, 0x41, 0x0f, 0x77, 0x77, 0x77, 0x2e, 0x65,
    0x78, 0x61, 0x6d, 0x70, 0x6c, 0x65, 0x2e, 0x63, 0x6f, 0x6d,
];

/// RFC 7541 C.3.2, refers to the dynamic table entry of C.3.1.
#[rustfmt::skip]
pub const SECOND_REQUEST: [u8; 14] = [
    0x82, 0x86, 0x84, 0xbe, 0x58, 0x08, 0x6e,
    0x6f, 0x2d, 0x63, 0x61, 0x63, 0x68, 0x65,
];

/// Eight bytes: :method GET, :scheme http, :path /, :authority abc.
pub const SHORT_BLOCK: [u8; 8] = [0x82, 0x86, 0x84, 0x41, 0x03, b'a', b'b', b'c'];

/// Size update to 4096, then :method GET.
pub const SIZE_UPDATE_BLOCK: [u8; 4] = [0x3f, 0xe1, 0x1f, 0x82];

/// Write a dump file under the temp directory, unique per test.
pub fn write_dump(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "hpack-harness-{}-{}.bin",
        std::process::id(),
        name
    ));
    std::fs::write(&path, bytes).unwrap();
    path
}
