use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use index::{LshIndexBuilder, LshParams};
use perceptual::{MinHashConfig, MinHasher, MinHashSignature};

fn signatures(hasher: &MinHasher, count: usize) -> Vec<MinHashSignature> {
    (0..count)
        .map(|i| {
            let shingles: Vec<String> = (0..12).map(|j| format!("label-{i}-{j}")).collect();
            hasher.signature(&shingles)
        })
        .collect()
}

fn bench_lsh(c: &mut Criterion) {
    let hasher = MinHasher::new(MinHashConfig::default()).unwrap();
    let params = LshParams::from_threshold(0.8, hasher.num_perm()).unwrap();

    let mut group = c.benchmark_group("lsh");
    for size in [1_000usize, 10_000] {
        let sigs = signatures(&hasher, size);

        group.bench_with_input(BenchmarkId::new("build", size), &sigs, |b, sigs| {
            b.iter(|| {
                let mut builder = LshIndexBuilder::new(params, hasher.num_perm()).unwrap();
                for (id, sig) in sigs.iter().enumerate() {
                    builder.insert(id, sig).unwrap();
                }
                builder.build()
            })
        });

        let mut builder = LshIndexBuilder::new(params, hasher.num_perm()).unwrap();
        for (id, sig) in sigs.iter().enumerate() {
            builder.insert(id, sig).unwrap();
        }
        let index = builder.build();
        group.bench_with_input(BenchmarkId::new("query", size), &sigs[size / 2], |b, sig| {
            b.iter(|| index.query(black_box(sig)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lsh);
criterion_main!(benches);
