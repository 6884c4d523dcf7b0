//! Tests for HPACK decoding through the harness decoder

use hpack_harness::{DecodeError, ErrorKind, HeaderDecoder, HeaderField, HpackDecoder};

fn decode_block(decoder: &mut HpackDecoder, data: &[u8]) -> Result<Vec<HeaderField>, DecodeError> {
    let mut fields = Vec::new();
    decoder.write(data, &mut fields)?;
    decoder.finalize(&mut fields)?;
    Ok(fields)
}

fn pairs(fields: &[HeaderField]) -> Vec<(&str, &str)> {
    fields
        .iter()
        .map(|f| (f.name.as_str(), f.value.as_str()))
        .collect()
}

#[test]
fn test_decode_multiple_indexed_headers() {
    let mut decoder = HpackDecoder::default();

    // 0x82 = :method: GET, 0x86 = :scheme: http, 0x84 = :path: /
    let headers = decode_block(&mut decoder, &[0x82, 0x86, 0x84]).unwrap();

    assert_eq!(
        pairs(&headers),
        [(":method", "GET"), (":scheme", "http"), (":path", "/")]
    );
}

#[test]
fn test_decode_literal_with_indexing() {
    let mut decoder = HpackDecoder::default();

    // 0x40 = literal with indexing, new name
    let data = [
        0x40, // Literal with indexing, new name
        0x06, // Name length: 6
        b'c', b'u', b's', b't', b'o', b'm',
        0x05, // Value length: 5
        b'v', b'a', b'l', b'u', b'e',
    ];

    let headers = decode_block(&mut decoder, &data).unwrap();
    assert_eq!(pairs(&headers), [("custom", "value")]);

    // 0xbe = first dynamic table entry
    let headers = decode_block(&mut decoder, &[0xbe]).unwrap();
    assert_eq!(pairs(&headers), [("custom", "value")]);
}

#[test]
/// https://tools.ietf.org/html/rfc7541#appendix-C.3
fn test_request_examples_without_huffman_coding() {
    let mut decoder = HpackDecoder::new(4096);

    // C.3.1. First Request
    #[rustfmt::skip]
    let first = [
        0x82, 0x86, 0x84, 0x41, 0x0f, 0x77, 0x77, 0x77, 0x2e, 0x65,
        0x78, 0x61, 0x6d, 0x70, 0x6c, 0x65, 0x2e, 0x63, 0x6f, 0x6d,
    ];
    let headers = decode_block(&mut decoder, &first).unwrap();
    assert_eq!(
        pairs(&headers),
        [
            (":method", "GET"),
            (":scheme", "http"),
            (":path", "/"),
            (":authority", "www.example.com"),
        ]
    );

    // C.3.2. Second Request
    #[rustfmt::skip]
    let second = [
        0x82, 0x86, 0x84, 0xbe, 0x58, 0x08, 0x6e,
        0x6f, 0x2d, 0x63, 0x61, 0x63, 0x68, 0x65,
    ];
    let headers = decode_block(&mut decoder, &second).unwrap();
    assert_eq!(headers.len(), 5);
    assert_eq!(headers[3], HeaderField::new(":authority", "www.example.com"));
    assert_eq!(headers[4], HeaderField::new("cache-control", "no-cache"));

    // C.3.3. Third Request
    #[rustfmt::skip]
    let third = [
        0x82, 0x87, 0x85, 0xbf, 0x40, 0x0a, 0x63, 0x75, 0x73, 0x74, 0x6f,
        0x6d, 0x2d, 0x6b, 0x65, 0x79, 0x0c, 0x63, 0x75, 0x73, 0x74, 0x6f,
        0x6d, 0x2d, 0x76, 0x61, 0x6c, 0x75, 0x65,
    ];
    let headers = decode_block(&mut decoder, &third).unwrap();
    assert_eq!(
        pairs(&headers),
        [
            (":method", "GET"),
            (":scheme", "https"),
            (":path", "/index.html"),
            (":authority", "www.example.com"),
            ("custom-key", "custom-value"),
        ]
    );
}

#[test]
/// https://tools.ietf.org/html/rfc7541#appendix-C.4
fn test_request_examples_with_huffman_coding() {
    let mut decoder = HpackDecoder::new(4096);

    // C.4.1. First Request
    #[rustfmt::skip]
    let first = [
        0x82, 0x86, 0x84, 0x41, 0x8c, 0xf1, 0xe3, 0xc2,
        0xe5, 0xf2, 0x3a, 0x6b, 0xa0, 0xab, 0x90, 0xf4, 0xff,
    ];
    let headers = decode_block(&mut decoder, &first).unwrap();
    assert_eq!(headers[3], HeaderField::new(":authority", "www.example.com"));

    // C.4.2. Second Request
    #[rustfmt::skip]
    let second = [
        0x82, 0x86, 0x84, 0xbe, 0x58, 0x86, 0xa8, 0xeb, 0x10, 0x64, 0x9c, 0xbf,
    ];
    let headers = decode_block(&mut decoder, &second).unwrap();
    assert_eq!(headers[4], HeaderField::new("cache-control", "no-cache"));

    // C.4.3. Third Request
    #[rustfmt::skip]
    let third = [
        0x82, 0x87, 0x85, 0xbf, 0x40, 0x88, 0x25, 0xa8, 0x49, 0xe9, 0x5b,
        0xa9, 0x7d, 0x7f, 0x89, 0x25, 0xa8, 0x49, 0xe9, 0x5b, 0xb8, 0xe8,
        0xb4, 0xbf,
    ];
    let headers = decode_block(&mut decoder, &third).unwrap();
    assert_eq!(headers[4], HeaderField::new("custom-key", "custom-value"));
}

#[test]
fn test_zero_table_keeps_nothing() {
    let mut decoder = HpackDecoder::new(0);

    // Literal with indexing still decodes, but does not fit in the table
    let headers = decode_block(&mut decoder, &[0x41, 0x03, b'a', b'b', b'c']).unwrap();
    assert_eq!(pairs(&headers), [(":authority", "abc")]);

    let err = decode_block(&mut decoder, &[0xbe]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Idx);
}

#[test]
fn test_size_update_within_allowed_maximum() {
    let mut decoder = HpackDecoder::new(4096);
    decoder.set_max_allowed_table_size(256);

    // 0x3f 0xe1 0x01 = size update to 256, then :method: GET
    let headers = decode_block(&mut decoder, &[0x3f, 0xe1, 0x01, 0x82]).unwrap();
    assert_eq!(pairs(&headers), [(":method", "GET")]);
}

#[test]
fn test_error_detail_names_the_decoder_error() {
    let mut decoder = HpackDecoder::default();
    let err = decode_block(&mut decoder, &[0xbe]).unwrap_err();
    assert!(err.detail.contains("HeaderIndexOutOfBounds"), "{}", err.detail);
}

#[test]
fn test_truncated_size_update_is_a_decode_error() {
    let mut decoder = HpackDecoder::default();

    let err = decode_block(&mut decoder, &[0x3f]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Buf);

    let mut overlong = vec![0x3f];
    overlong.extend([0xff; 10]);
    let err = decode_block(&mut decoder, &overlong).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Buf);
}

#[test]
fn test_overlong_integer_and_bad_huffman() {
    let mut decoder = HpackDecoder::default();

    let mut overlong = vec![0xff; 10];
    overlong.push(0x01);
    let err = decode_block(&mut decoder, &overlong).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Int);

    // Huffman string whose padding is not a prefix of EOS
    let err = decode_block(&mut decoder, &[0x00, 0x81, 0x00, 0x01, b'x']).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Huf);
}
