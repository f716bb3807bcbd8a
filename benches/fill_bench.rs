use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fieldfill::{FillLevel, FillOptions, MatcherConfig, Record, ReferenceVocabulary, fill_records};

const SUBJECTS: &[&str] = &[
    "computer science",
    "economics",
    "data science applications",
    "modern history",
    "molecular biology",
    "civil engineering",
    "business administration",
    "public health",
];

fn synthetic(size: usize) -> Vec<Record> {
    (0..size)
        .map(|i| {
            let subject = SUBJECTS[i % SUBJECTS.len()];
            if i % 3 == 0 {
                Record::new(Some(&format!("BSc {subject} {i}")), None)
            } else if i % 3 == 1 {
                Record::new(Some(&format!("{subject} studies")), None)
            } else {
                Record::new(Some(&format!("MSc {subject}")), Some(subject))
            }
        })
        .collect()
}

fn fill_bench(c: &mut Criterion) {
    let vocab = ReferenceVocabulary::from_terms(["biology", "engineering", "health"]);
    let mut group = c.benchmark_group("fill");
    for size in [1_000usize, 10_000] {
        let records = synthetic(size);
        for parallel in [false, true] {
            let options = FillOptions::new(FillLevel::Reference)
                .with_matcher(MatcherConfig::default().with_parallel(parallel));
            let id = BenchmarkId::new(if parallel { "parallel" } else { "sequential" }, size);
            group.bench_with_input(id, &records, |b, records| {
                b.iter(|| {
                    let out = fill_records(black_box(records), &options, Some(&vocab))
                        .expect("bench fill");
                    black_box(out.report);
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, fill_bench);
criterion_main!(benches);
