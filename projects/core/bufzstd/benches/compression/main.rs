use bufzstd::{
    compress, compress_batch, compress_bound, compress_level, decompress, decompress_batch,
    decompress_size_hint, CodecProfile, BEST_COMPRESSION, BEST_SPEED, DEFAULT_COMPRESSION,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
use pprof::criterion::{Output, PProfProfiler};

/// Mildly compressible test data: a short text pattern with a varying counter mixed in.
fn generate_input(len: usize) -> Vec<u8> {
    let pattern = b"bufzstd benchmark payload ";
    (0..len)
        .map(|i| pattern[i % pattern.len()] ^ ((i / 4096) as u8 & 0x0F))
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compress");

    for size in [4 * 1024, 128 * 1024, 1024 * 1024] {
        let input = generate_input(size);
        group.throughput(Throughput::Bytes(size as u64));

        for level in [BEST_SPEED, DEFAULT_COMPRESSION, BEST_COMPRESSION] {
            // Reuse one buffer across iterations, as a pooled caller would.
            let mut pooled = Some(Vec::with_capacity(compress_bound(size)));
            group.bench_with_input(
                BenchmarkId::new(format!("level_{level}"), size),
                &input,
                |b, input| {
                    b.iter(|| {
                        let dst = pooled.take().unwrap_or_default();
                        let out = compress_level(dst, black_box(input), level).unwrap();
                        pooled = Some(out);
                    })
                },
            );
        }

        group.bench_with_input(BenchmarkId::new("allocating", size), &input, |b, input| {
            b.iter(|| compress(Vec::new(), black_box(input)).unwrap())
        });
    }

    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decompress");

    for size in [4 * 1024, 128 * 1024, 1024 * 1024] {
        let input = generate_input(size);
        let compressed = compress(Vec::new(), &input).unwrap();
        group.throughput(Throughput::Bytes(size as u64));

        let mut pooled = Some(Vec::with_capacity(decompress_size_hint(&compressed)));
        group.bench_with_input(BenchmarkId::new("pooled", size), &compressed, |b, src| {
            b.iter(|| {
                let dst = pooled.take().unwrap_or_default();
                pooled = Some(decompress(dst, black_box(src)).unwrap());
            })
        });

        group.bench_with_input(BenchmarkId::new("allocating", size), &compressed, |b, src| {
            b.iter(|| decompress(Vec::new(), black_box(src)).unwrap())
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch");
    let profile = CodecProfile::batch().unwrap();

    let size = 128 * 1024;
    let input = generate_input(size);
    let compressed = compress_batch(&profile, &input).unwrap();
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("compress_batch", |b| {
        b.iter(|| compress_batch(&profile, black_box(&input)).unwrap())
    });
    group.bench_function("decompress_batch", |b| {
        b.iter(|| decompress_batch(Vec::new(), black_box(&compressed)).unwrap())
    });

    group.finish();
}

fn criterion_benchmark(c: &mut Criterion) {
    bench_compress(c);
    bench_decompress(c);
    bench_batch(c);
}

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
)))]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
