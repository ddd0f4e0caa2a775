//! LZW codec integration tests.

use std::io::Cursor;
use zwl_lzw::{
    CodeFraming, ErrorKind, LzwConfig, LzwDecoder, LzwEncoder, LzwError, SessionStats,
    WidthEvent, compress, decompress,
};

fn random_bytes(size: usize, mut seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

fn text_like(size: usize) -> Vec<u8> {
    let text = b"The quick brown fox jumps over the lazy dog. \
                 Pack my box with five dozen liquor jugs. \
                 How vexingly quick daft zebras jump! ";
    text.iter().copied().cycle().take(size).collect()
}

/// Compress and decompress with tracing on both sides.
fn traced_roundtrip(data: &[u8], config: LzwConfig) -> (Vec<u8>, SessionStats, SessionStats) {
    let mut encoder = LzwEncoder::new(Vec::new(), config).unwrap();
    encoder.enable_width_trace();
    encoder.encode(data).unwrap();
    let (compressed, enc_stats) = encoder.finish().unwrap();

    let mut decoder = LzwDecoder::new(Cursor::new(&compressed), config.framing).unwrap();
    decoder.enable_width_trace();
    let mut out = Vec::new();
    decoder.decode_to(&mut out).unwrap();
    assert_eq!(out, data);

    let dec_stats = decoder.stats();
    drop(decoder);
    (compressed, enc_stats, dec_stats)
}

#[test]
fn test_roundtrip_matrix() {
    let inputs = [
        b"A".to_vec(),
        text_like(20_000),
        random_bytes(20_000, 0x1234_5678),
        vec![0u8; 30_000],
    ];

    for bits in 12..=24u8 {
        for framing in [CodeFraming::Fixed, CodeFraming::TruncatedBinary] {
            for binary in [false, true] {
                let config = LzwConfig::new(bits)
                    .unwrap()
                    .with_framing(framing)
                    .with_binary_mode(binary);
                for input in &inputs {
                    let compressed = compress(input, config).unwrap();
                    let decompressed = decompress(&compressed, framing).unwrap();
                    assert!(
                        decompressed == *input,
                        "roundtrip failed: {} bits, {:?}, binary {}, {} bytes",
                        bits,
                        framing,
                        binary,
                        input.len()
                    );
                }
            }
        }
    }
}

#[test]
fn test_roundtrip_widest_codes() {
    let data = text_like(5000);
    for bits in [25u8, 26] {
        for framing in [CodeFraming::Fixed, CodeFraming::TruncatedBinary] {
            for binary in [false, true] {
                let config = LzwConfig::new(bits)
                    .unwrap()
                    .with_framing(framing)
                    .with_binary_mode(binary);
                let compressed = compress(&data, config).unwrap();
                assert_eq!(decompress(&compressed, framing).unwrap(), data);
            }
        }
    }
}

/// Widest code width reached in a trace.
fn peak_width(stats: &SessionStats) -> u8 {
    stats
        .width_trace
        .iter()
        .filter_map(|event| match *event {
            WidthEvent::Grow { code_bits, .. } => Some(code_bits),
            WidthEvent::Reset => None,
        })
        .max()
        .unwrap_or(9)
}

#[test]
fn test_roundtrip_wide_random() {
    // About 1.5M codes: past 2^20, so widths reach 20-21 bits and the
    // 20-bit space closes a full-width epoch.
    let data = random_bytes(3_000_000, 0x5EED_0001);

    for bits in [20u8, 21, 22, 26] {
        for framing in [CodeFraming::Fixed, CodeFraming::TruncatedBinary] {
            for binary in [false, true] {
                let config = LzwConfig::new(bits)
                    .unwrap()
                    .with_framing(framing)
                    .with_binary_mode(binary);
                let label = format!("{} bits, {:?}, binary {}", bits, framing, binary);

                let (_, enc, dec) = traced_roundtrip(&data, config);
                assert_eq!(enc.width_trace, dec.width_trace, "{}", label);
                assert_eq!(enc.codes, dec.codes, "{}", label);
                assert_eq!(peak_width(&enc), bits.min(21), "{}", label);
                if bits == 20 {
                    assert!(enc.resets >= 1, "{}", label);
                    let resets = enc
                        .width_trace
                        .iter()
                        .filter(|event| **event == WidthEvent::Reset)
                        .count();
                    assert_eq!(resets as u64, enc.resets, "{}", label);
                } else {
                    assert_eq!(enc.resets, 0, "{}", label);
                }
            }
        }
    }
}

#[test]
fn test_tagged_four_classes_full_width_reset() {
    // Enough codes to pass 2^21 (22-bit codes, all four tag classes) and
    // then fill the 22-bit space.
    let data = random_bytes(12_000_000, 0x5EED_0002);

    for framing in [CodeFraming::Fixed, CodeFraming::TruncatedBinary] {
        let config = LzwConfig::new(22)
            .unwrap()
            .with_framing(framing)
            .with_binary_mode(true);

        let (_, enc, dec) = traced_roundtrip(&data, config);
        assert_eq!(enc.width_trace, dec.width_trace, "{:?}", framing);
        assert_eq!(peak_width(&enc), 22);
        assert!(enc.resets >= 1, "{:?}: no reset", framing);
        assert_eq!(enc.resets, dec.resets);
    }
}

#[test]
fn test_ten_repeated_bytes() {
    let original = b"AAAAAAAAAA";
    let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::from_ratio(0)).unwrap();
    encoder.encode(original).unwrap();
    let (compressed, stats) = encoder.finish().unwrap();

    // 'A', "AA", "AAA", "AAAA" then EOF: 65 header bits + 5 nine-bit codes.
    assert_eq!(stats.codes, 4);
    assert_eq!(compressed.len(), 16);
    assert_eq!(
        decompress(&compressed, CodeFraming::Fixed).unwrap(),
        original
    );
}

#[test]
fn test_random_megabyte_does_not_shrink() {
    let original = random_bytes(1 << 20, 0xDEAD_BEEF);

    // Small epochs keep most codes literal at 9-12 bits.
    let compressed = compress(&original, LzwConfig::from_ratio(0)).unwrap();
    assert!(compressed.len() >= original.len() * 9 / 8);
    assert_eq!(
        decompress(&compressed, CodeFraming::Fixed).unwrap(),
        original
    );

    let compressed = compress(&original, LzwConfig::default()).unwrap();
    assert!(compressed.len() > original.len());
    assert_eq!(
        decompress(&compressed, CodeFraming::Fixed).unwrap(),
        original
    );
}

#[test]
fn test_small_table_many_epochs() {
    for framing in [CodeFraming::Fixed, CodeFraming::TruncatedBinary] {
        for binary in [false, true] {
            let config = LzwConfig::from_ratio(0)
                .with_table_max(300)
                .with_framing(framing)
                .with_binary_mode(binary);

            let run = vec![b'Z'; 10_000];
            let (_, enc, dec) = traced_roundtrip(&run, config);
            assert!(enc.resets >= 2, "only {} resets", enc.resets);
            assert_eq!(enc.resets, dec.resets);

            let cycle: Vec<u8> = (0..10_000u32).map(|i| b"0123456789"[(i % 10) as usize]).collect();
            let (_, enc, dec) = traced_roundtrip(&cycle, config);
            assert!(enc.resets >= 2);
            assert_eq!(enc.codes, dec.codes);
        }
    }
}

#[test]
fn test_epoch_symmetry() {
    let data = text_like(200_000);
    let configs = [
        LzwConfig::from_ratio(0),
        LzwConfig::from_ratio(0).with_table_max(1000),
        LzwConfig::from_ratio(2).with_framing(CodeFraming::TruncatedBinary),
        LzwConfig::from_ratio(1).with_binary_mode(true),
    ];

    for config in configs {
        let (_, enc, dec) = traced_roundtrip(&data, config);
        assert!(!enc.width_trace.is_empty());
        assert_eq!(enc.width_trace, dec.width_trace, "{:?}", config);
        assert_eq!(enc.codes, dec.codes);
        assert_eq!(enc.packed_bytes, dec.packed_bytes);
        assert_eq!(enc.raw_bytes, dec.raw_bytes);
    }
}

#[test]
fn test_final_code_triggers_reset() {
    // Every input length in this range ends with a different code count,
    // so at least one of them closes an epoch on its final data code.
    let config = LzwConfig::from_ratio(0).with_table_max(259);
    for len in 1..40 {
        let data = random_bytes(len, len as u64);
        let (_, enc, dec) = traced_roundtrip(&data, config);
        assert_eq!(enc.width_trace, dec.width_trace);
        assert_eq!(enc.resets, enc.codes);
    }
}

#[test]
fn test_growth_trace_shape() {
    let data = random_bytes(100_000, 7);
    let (_, enc, _) = traced_roundtrip(&data, LzwConfig::from_ratio(0));

    let mut expected_bits = 9;
    for event in &enc.width_trace {
        match *event {
            WidthEvent::Grow {
                code_bits,
                max_code,
            } => {
                expected_bits += 1;
                assert_eq!(code_bits, expected_bits);
                assert_eq!(max_code, 1 << code_bits);
                assert!(code_bits <= 12);
            }
            WidthEvent::Reset => expected_bits = 9,
        }
    }
    assert!(enc.resets > 0);
}

#[test]
fn test_truncated_framing_is_smaller() {
    let data = text_like(50_000);
    let fixed = compress(&data, LzwConfig::from_ratio(4)).unwrap();
    let truncated = compress(
        &data,
        LzwConfig::from_ratio(4).with_framing(CodeFraming::TruncatedBinary),
    )
    .unwrap();
    assert!(truncated.len() <= fixed.len());
}

#[test]
fn test_binary_flag_honoured_by_decoder() {
    let data = random_bytes(4096, 99);
    let compressed = compress(&data, LzwConfig::default().with_binary_mode(true)).unwrap();

    let decoder = LzwDecoder::new(Cursor::new(&compressed), CodeFraming::Fixed).unwrap();
    assert!(decoder.header().binary_mode);
    assert_eq!(
        decompress(&compressed, CodeFraming::Fixed).unwrap(),
        data
    );
}

#[test]
fn test_corrupt_magic() {
    let mut compressed = compress(b"hello hello hello", LzwConfig::default()).unwrap();
    compressed[7] ^= 0x01;
    let err = decompress(&compressed, CodeFraming::Fixed).unwrap_err();
    assert!(matches!(err, LzwError::InvalidMagic { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_truncated_stream() {
    let data = text_like(10_000);
    let compressed = compress(&data, LzwConfig::default()).unwrap();

    // Whole blocks removed: the code stream stops before EOF.
    let cut = &compressed[..compressed.len() / 2 / 8 * 8];
    let err = decompress(cut, CodeFraming::Fixed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);

    // A partial final block.
    let cut = &compressed[..compressed.len() - 3];
    let err = decompress(cut, CodeFraming::Fixed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_empty_input_rejected() {
    let err = compress(&[], LzwConfig::default()).unwrap_err();
    assert!(matches!(err, LzwError::EmptyInput));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
