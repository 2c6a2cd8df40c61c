use bytepack::{decode, decode_with_limits, DecodeError, DecodeLimits, Decoder};
use proptest::prelude::*;

#[test]
fn truncated_uint32_reports_one_byte_consumed() {
    // Only the uint32 marker, none of its 4 payload bytes.
    let err = decode(&[0xceu8][..]).unwrap_err();
    match err {
        DecodeError::Truncated { consumed, missing } => {
            assert_eq!(consumed, 1);
            assert_eq!(missing, 4);
        }
        other => panic!("expected Truncated, got {other:?}"),
    }
}

#[test]
fn truncated_mid_container_keeps_partial_count() {
    // fixarray of 3 but only one element present.
    let err = decode(&[0x93u8, 0x01][..]).unwrap_err();
    match err {
        DecodeError::Truncated { consumed, .. } => assert_eq!(consumed, 2),
        other => panic!("expected Truncated, got {other:?}"),
    }
}

#[test]
fn truncated_raw_payload() {
    // raw16 declaring 4 bytes, delivering 2.
    let err = decode(&[0xdau8, 0x00, 0x04, b'a', b'b'][..]).unwrap_err();
    match err {
        DecodeError::Truncated { consumed, missing } => {
            assert_eq!(consumed, 5);
            assert_eq!(missing, 2);
        }
        other => panic!("expected Truncated, got {other:?}"),
    }
}

#[test]
fn empty_input_is_truncated_at_zero() {
    let err = decode(&[][..]).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Truncated {
            consumed: 0,
            missing: 1
        }
    ));
}

#[test]
fn malformed_code_fails_without_consuming_more() {
    let mut decoder = Decoder::new(&[0xc1u8, 0xaa, 0xbb][..]);
    let err = decoder.decode().unwrap_err();
    match err {
        DecodeError::MalformedFormatCode { code, offset } => {
            assert_eq!(code, 0xc1);
            assert_eq!(offset, 0);
        }
        other => panic!("expected MalformedFormatCode, got {other:?}"),
    }
    // Exactly the marker byte was consumed, nothing after it.
    assert_eq!(decoder.bytes_consumed(), 1);
}

#[test]
fn all_reserved_codes_are_rejected() {
    for code in [0xc1u8, 0xc4, 0xc5, 0xc6, 0xc7, 0xc8, 0xc9, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9] {
        let err = decode(&[code][..]).unwrap_err();
        assert!(
            matches!(err, DecodeError::MalformedFormatCode { code: c, .. } if c == code),
            "code {code:#04x} not rejected: {err:?}"
        );
    }
}

#[test]
fn malformed_code_inside_a_container_aborts_the_decode() {
    // [ 1, <reserved 0xd4>, 3 ]
    let err = decode(&[0x93u8, 0x01, 0xd4, 0x03][..]).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::MalformedFormatCode { code: 0xd4, offset: 2 }
    ));
}

#[test]
fn oversized_raw_is_rejected_before_allocation() {
    // raw32 declaring 4 GiB - 1.
    let err = decode(&[0xdbu8, 0xff, 0xff, 0xff, 0xff][..]).unwrap_err();
    match err {
        DecodeError::OversizedLength { declared, limit, .. } => {
            assert_eq!(declared, 0xffff_ffff);
            assert_eq!(limit, DecodeLimits::default().max_bytes);
        }
        other => panic!("expected OversizedLength, got {other:?}"),
    }
}

#[test]
fn oversized_container_count_is_rejected() {
    // map32 declaring u32::MAX entries.
    let err = decode(&[0xdfu8, 0xff, 0xff, 0xff, 0xff][..]).unwrap_err();
    assert!(matches!(err, DecodeError::OversizedLength { .. }));
}

#[test]
fn limits_are_configurable() {
    let tight = DecodeLimits {
        max_bytes: 2,
        max_items: 2,
        max_depth: 2,
    };

    // "abc" exceeds max_bytes = 2.
    let err = decode_with_limits(&[0xa3u8, b'a', b'b', b'c'][..], tight).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::OversizedLength {
            declared: 3,
            limit: 2,
            ..
        }
    ));

    // [[[nil]]] exceeds max_depth = 2.
    let err = decode_with_limits(&[0x91u8, 0x91, 0x91, 0xc0][..], tight).unwrap_err();
    assert!(matches!(err, DecodeError::DepthLimitExceeded { limit: 2 }));

    // [[nil]] stays within it.
    let (value, _) = decode_with_limits(&[0x91u8, 0x91, 0xc0][..], tight).unwrap();
    assert!(value.as_array().is_some());
}

#[test]
fn deep_nesting_fails_instead_of_exhausting_the_stack() {
    // 600 nested fixarray-of-1, far beyond the default depth of 128.
    let mut bytes = vec![0x91u8; 600];
    bytes.push(0xc0);
    let err = decode(bytes.as_slice()).unwrap_err();
    assert!(matches!(err, DecodeError::DepthLimitExceeded { limit: 128 }));
}

#[test]
fn container_key_position_is_invalid() {
    // { [nil]: 1 }
    let err = decode(&[0x81u8, 0x91, 0xc0, 0x01][..]).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidMapKey { offset: 1 }));
}

#[test]
fn io_errors_carry_the_offset() {
    struct FailAfterOne(bool);
    impl std::io::Read for FailAfterOne {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0 {
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "reset",
                ))
            } else {
                self.0 = true;
                buf[0] = 0xcc; // uint8 marker, payload never arrives
                Ok(1)
            }
        }
    }

    let err = decode(FailAfterOne(false)).unwrap_err();
    match err {
        DecodeError::Io { offset, .. } => assert_eq!(offset, 1),
        other => panic!("expected Io, got {other:?}"),
    }
}

proptest! {
    /// Arbitrary input never panics the decoder; it either decodes or fails
    /// with a structured error, and consumption never exceeds the input.
    #[test]
    fn arbitrary_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut decoder = Decoder::new(data.as_slice());
        let _ = decoder.decode();
        prop_assert!(decoder.bytes_consumed() <= data.len());
    }

    /// Reflected and materialized decodes agree on every input.
    #[test]
    fn output_modes_agree(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let materialized = bytepack::decode(data.as_slice());
        let reflected = bytepack::decode_reflected(data.as_slice());
        match (materialized, reflected) {
            (Ok((value, n1)), Ok((handle, n2))) => {
                prop_assert_eq!(n1, n2);
                prop_assert_eq!(handle.into_value(), value);
            }
            (Err(_), Err(_)) => {}
            (a, b) => prop_assert!(false, "modes disagree: {:?} vs {:?}", a.is_ok(), b.is_ok()),
        }
    }
}
