use canopy_core::budget::Usage;
use canopy_core::control::ControlVector;
use canopy_core::search::{select, Candidate, PolicySnapshot};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| {
            let mu = (i % 97) as f64 / 97.0;
            Candidate {
                text: format!("candidate {i}"),
                mu,
                sigma: 0.5,
                score: mu + 0.15 * 0.5,
                usage: Usage::ZERO,
                label: "default".to_string(),
                pi: PolicySnapshot {
                    vector: ControlVector::baseline(),
                    beta_eff: 0.15,
                },
            }
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let cands = make_candidates(1024);
    c.bench_function("select_top8_of_1024", |b| {
        b.iter(|| select(black_box(cands.clone()), 8))
    });
}

criterion_group!(benches, bench_select);
criterion_main!(benches);
