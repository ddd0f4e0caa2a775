//! Performance benchmarks for zwl-lzw
//!
//! This benchmark suite evaluates:
//! - Compression/decompression throughput for various data patterns
//! - The cost of each code framing (fixed, truncated binary, tagged)
//! - The effect of the maximum code width on speed

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use zwl_lzw::{CodeFraming, LzwConfig, compress, decompress};

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

/// Generate test data patterns for benchmarking
mod test_data {
    /// Uniform data - all bytes are the same (best compression)
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// Random data - no patterns (worst compression)
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Text-like data - realistic scenario
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. \
                     How vexingly quick daft zebras jump! ";
        text.iter().copied().cycle().take(size).collect()
    }

    /// Gradient bytes, like an uncompressed grayscale image
    pub fn image_like(size: usize) -> Vec<u8> {
        let side = (size as f64).sqrt() as usize;
        let mut data = Vec::with_capacity(size);
        for y in 0..side {
            for x in 0..side {
                data.push((((x * 255 / side) + (y * 255 / side)) / 2) as u8);
            }
        }
        data.resize(size, 128);
        data
    }
}

const SIZE: usize = 1 << 20;

const PATTERNS: [(&str, PatternGenerator); 4] = [
    ("uniform", test_data::uniform as PatternGenerator),
    ("random", test_data::random as PatternGenerator),
    ("text", test_data::text_like as PatternGenerator),
    ("image", test_data::image_like as PatternGenerator),
];

fn bench_compression_speed(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_speed");

    for (name, generator) in PATTERNS {
        let data = generator(SIZE);
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| black_box(compress(black_box(data), LzwConfig::default()).unwrap()));
        });
    }

    group.finish();
}

fn bench_decompression_speed(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_speed");

    for (name, generator) in PATTERNS {
        let compressed = compress(&generator(SIZE), LzwConfig::default()).unwrap();
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &compressed, |b, data| {
            b.iter(|| black_box(decompress(black_box(data), CodeFraming::Fixed).unwrap()));
        });
    }

    group.finish();
}

fn bench_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("framing");
    let data = test_data::text_like(SIZE);

    let variants = [
        ("fixed", CodeFraming::Fixed, false),
        ("truncated", CodeFraming::TruncatedBinary, false),
        ("tagged", CodeFraming::Fixed, true),
        ("tagged_truncated", CodeFraming::TruncatedBinary, true),
    ];

    for (name, framing, binary) in variants {
        let config = LzwConfig::default()
            .with_framing(framing)
            .with_binary_mode(binary);
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::new("roundtrip", name), &data, |b, data| {
            b.iter(|| {
                let compressed = compress(black_box(data), config).unwrap();
                black_box(decompress(&compressed, framing).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_code_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_width");
    group.sample_size(10);
    let data = test_data::random(SIZE);

    for ratio in [0u8, 4, 8, 10, 12] {
        let config = LzwConfig::from_ratio(ratio);
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(config.code_max_bits),
            &data,
            |b, data| {
                b.iter(|| black_box(compress(black_box(data), config).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compression_speed,
    bench_decompression_speed,
    bench_framing,
    bench_code_width,
);
criterion_main!(benches);
