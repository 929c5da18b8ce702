use std::io::Cursor;

use codec::{
    deserialize, deserialize_from, deserialize_with_limits, serialize, serialize_into, ByteReader,
    CodecError, CodecLimits, Decimal, FormatReason, IoSink, IoSource, LimitKind, ValueReason,
};

#[test]
fn io_sink_and_source_round_trip() {
    let mut sink = IoSink::new(Vec::new());
    serialize_into(&vec!["one".to_string(), "two".to_string()], &mut sink).unwrap();
    serialize_into(&Some(9u8), &mut sink).unwrap();
    assert_eq!(sink.bytes_written(), 5 + 8 + 8 + 2);
    let bytes = sink.into_inner();

    let mut source = IoSource::new(Cursor::new(bytes));
    let limits = CodecLimits::default();
    let words: Vec<String> = deserialize_from(&mut source, &limits).unwrap();
    let flag: Option<u8> = deserialize_from(&mut source, &limits).unwrap();
    assert_eq!(words, vec!["one", "two"]);
    assert_eq!(flag, Some(9));
    assert_eq!(source.bytes_read(), 23);
}

#[test]
fn consecutive_values_from_one_reader() {
    let mut bytes = serialize(&1u32).unwrap();
    bytes.extend(serialize(&"x".to_string()).unwrap());
    let mut reader = ByteReader::new(&bytes);
    let limits = CodecLimits::for_testing();
    assert_eq!(deserialize_from::<u32>(&mut reader, &limits).unwrap(), 1);
    assert_eq!(deserialize_from::<String>(&mut reader, &limits).unwrap(), "x");
    assert!(reader.is_empty());
}

#[test]
fn huge_counts_hit_limits_before_allocating() {
    let bytes = [0x01, 0xFF, 0xFF, 0xFF, 0x7F];
    let limits = CodecLimits::default();
    assert_eq!(
        deserialize_with_limits::<Vec<u64>>(&bytes, &limits),
        Err(CodecError::LimitsExceeded {
            kind: LimitKind::SequenceLength,
            limit: CodecLimits::default().max_sequence_len,
            actual: i32::MAX as usize,
        })
    );
    assert!(matches!(
        deserialize_with_limits::<Vec<u8>>(&bytes, &limits),
        Err(CodecError::LimitsExceeded {
            kind: LimitKind::BlobBytes,
            ..
        })
    ));
    assert!(matches!(
        deserialize::<Vec<u64>>(&bytes),
        Err(CodecError::EndOfStream { .. })
    ));
}

#[test]
fn round_trip_holds_one_past_each_default_limit() {
    let limits = CodecLimits::default();

    let flags = vec![false; limits.max_sequence_len + 1];
    let bytes = serialize(&flags).unwrap();
    assert_eq!(deserialize::<Vec<bool>>(&bytes).unwrap(), flags);
    assert_eq!(
        deserialize_with_limits::<Vec<bool>>(&bytes, &limits),
        Err(CodecError::LimitsExceeded {
            kind: LimitKind::SequenceLength,
            limit: limits.max_sequence_len,
            actual: limits.max_sequence_len + 1,
        })
    );

    let text = "a".repeat(limits.max_string_bytes + 1);
    let bytes = serialize(&text).unwrap();
    assert_eq!(deserialize::<String>(&bytes).unwrap(), text);
    assert!(matches!(
        deserialize_with_limits::<String>(&bytes, &limits),
        Err(CodecError::LimitsExceeded {
            kind: LimitKind::StringBytes,
            ..
        })
    ));
}

#[test]
fn testing_limits_are_tight() {
    let bytes = serialize(&vec![0u8; 1025]).unwrap();
    assert!(matches!(
        deserialize_with_limits::<Vec<u8>>(&bytes, &CodecLimits::for_testing()),
        Err(CodecError::LimitsExceeded {
            kind: LimitKind::BlobBytes,
            limit: 1024,
            actual: 1025,
        })
    ));
}

#[test]
fn negative_length_is_invalid_format() {
    let bytes = [0x01, 0xFF, 0xFF, 0xFF, 0xFF];
    assert_eq!(
        deserialize::<String>(&bytes),
        Err(CodecError::InvalidFormat {
            reason: FormatReason::NegativeLength { raw: -1 }
        })
    );
}

#[test]
fn invalid_leaf_bytes() {
    assert_eq!(
        deserialize::<bool>(&[0x02]),
        Err(CodecError::InvalidFormat {
            reason: FormatReason::InvalidBool { value: 2 }
        })
    );
    assert_eq!(
        deserialize::<char>(&[0x00, 0xD8]),
        Err(CodecError::InvalidFormat {
            reason: FormatReason::InvalidChar { unit: 0xD800 }
        })
    );
    assert_eq!(
        deserialize::<String>(&[0x01, 0x01, 0x00, 0x00, 0x00, 0xFF]),
        Err(CodecError::InvalidFormat {
            reason: FormatReason::InvalidUtf8
        })
    );
    let mut bad_decimal = vec![0u8; 16];
    bad_decimal[0] = 0x01;
    assert!(matches!(
        deserialize::<Decimal>(&bad_decimal),
        Err(CodecError::InvalidFormat {
            reason: FormatReason::InvalidDecimal { .. }
        })
    ));
}

#[test]
fn chars_outside_bmp_fail_on_encode() {
    assert_eq!(
        serialize(&'\u{1F600}'),
        Err(CodecError::InvalidValue {
            type_name: "char",
            reason: ValueReason::CharOutsideBmp { ch: '\u{1F600}' }
        })
    );
    assert_eq!(serialize(&'é').unwrap(), vec![0xE9, 0x00]);
}

#[test]
fn decimal_word_order() {
    let value = Decimal::from_parts(0x0403_0201, 0x0807_0605, 0x0C0B_0A09, true, 2).unwrap();
    let bytes = serialize(&value).unwrap();
    assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x02, 0x80]);
    assert_eq!(&bytes[4..8], &[0x09, 0x0A, 0x0B, 0x0C]);
    assert_eq!(&bytes[8..12], &[0x01, 0x02, 0x03, 0x04]);
    assert_eq!(&bytes[12..16], &[0x05, 0x06, 0x07, 0x08]);
    assert_eq!(deserialize::<Decimal>(&bytes).unwrap(), value);
}
