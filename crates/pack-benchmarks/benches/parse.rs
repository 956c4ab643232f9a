//! Version, range and manifest parsing benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pack_benchmarks::{criterion_config, sample_versions};
use pack_core::types::{PackManifest, Version, VersionRange};
use pack_resolver::semver::{compare_versions, find_best_match};
use std::str::FromStr;

fn bench_version_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("version_parsing");
    let versions = sample_versions(1000);
    group.throughput(Throughput::Elements(versions.len() as u64));

    group.bench_function("versions", |b| {
        b.iter(|| {
            for version in &versions {
                black_box(Version::from_str(version).unwrap());
            }
        });
    });

    let ranges: Vec<String> = versions
        .iter()
        .zip(["^", "~", ">=", "<", ""].iter().cycle())
        .map(|(version, op)| format!("{}{}", op, version))
        .collect();
    group.bench_function("ranges", |b| {
        b.iter(|| {
            for range in &ranges {
                black_box(VersionRange::parse(range).unwrap());
            }
        });
    });

    group.finish();
}

fn bench_version_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("version_ordering");
    let versions = sample_versions(1000);

    group.bench_function("compare_pairs", |b| {
        b.iter(|| {
            for pair in versions.windows(2) {
                black_box(compare_versions(&pair[0], &pair[1]).unwrap());
            }
        });
    });

    for count in [10, 100, 1000] {
        let candidates = sample_versions(count);
        group.bench_with_input(
            BenchmarkId::new("find_best_match", count),
            &candidates,
            |b, candidates| {
                b.iter(|| black_box(find_best_match(">=1.0.0", candidates, false).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_manifest_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("manifest_parsing");

    for dep_count in [10, 50, 100, 500] {
        group.throughput(Throughput::Elements(dep_count as u64));

        let mut manifest = PackManifest::new("bench", Version::new(1, 0, 0));
        for i in 0..dep_count {
            manifest = manifest.with_dependency(format!("dep-{}", i), format!("^{}.0.0", i % 9));
        }
        let json = manifest.to_json().unwrap();

        group.bench_with_input(
            BenchmarkId::new("dependencies", dep_count),
            &json,
            |b, content| {
                b.iter(|| black_box(PackManifest::from_json(content, "bench").unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_version_parsing, bench_version_ordering, bench_manifest_parsing
}
criterion_main!(benches);
