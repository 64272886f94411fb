use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use transitmap_graph::{Path, cast_to_path, stitch, topological_sort};

/// Synthetic trip patterns for a line with a trunk and `branches` tails.
///
/// Every branch runs the full trunk then its own tail; every third pattern
/// is a short turn that stops halfway along the trunk, and every fifth skips
/// alternate trunk stops like an express.
struct SyntheticLine {
    patterns: Vec<Path<u32>>,
}

const TIERS: [(&str, u32, u32); 3] = [("small", 20, 2), ("medium", 120, 4), ("large", 600, 8)];

fn synthetic_line(trunk: u32, branches: u32) -> SyntheticLine {
    let mut patterns = Vec::new();
    for branch in 0..branches {
        let tail = (0..trunk / 4).map(|i| 1_000_000 + branch * 10_000 + i);
        patterns.push(path((0..trunk).chain(tail)));
        patterns.push(path((0..trunk).filter(|stop| stop % 2 == 0)));
        if branch % 3 == 0 {
            patterns.push(path(0..trunk / 2));
        }
        if branch % 5 == 0 {
            patterns.push(path((trunk / 3)..trunk));
        }
    }
    SyntheticLine { patterns }
}

fn path(stops: impl IntoIterator<Item = u32>) -> Path<u32> {
    Path::new(stops).unwrap_or_else(|err| panic!("synthetic stops are unique: {err}"))
}

fn bench_stitch(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitch.tiered");

    for (name, trunk, branches) in TIERS {
        let line = synthetic_line(trunk, branches);
        group.throughput(Throughput::Elements(line.patterns.len() as u64));

        group.bench_with_input(BenchmarkId::new("stitch", name), &line, |b, line| {
            b.iter(|| black_box(stitch(&line.patterns)));
        });

        group.bench_with_input(BenchmarkId::new("stitch+order", name), &line, |b, line| {
            b.iter(|| {
                let graph = stitch(&line.patterns);
                let ordered = cast_to_path(&graph).map_or_else(
                    || topological_sort(&graph).map(|sorted| sorted.ordered_labels().count()),
                    |path| Ok(path.len()),
                );
                black_box(ordered)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stitch);
criterion_main!(benches);
