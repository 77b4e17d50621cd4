// benches/lcs_benchmarks.rs
// Throughput of the similarity vector pass per engine tier.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use quadlcs::{similarity_vector, LcsBp, Measure, Sequence, SimdTier, Transform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_sequence(rng: &mut StdRng, len: usize) -> Sequence {
    Sequence::from_codes((0..len).map(|_| rng.gen_range(0..4u8)).collect())
}

fn bench_similarity_vector(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let reference = random_sequence(&mut rng, 1024);
    let candidates: Vec<Sequence> = (0..64).map(|_| random_sequence(&mut rng, 1024)).collect();
    let mut out = vec![0.0; candidates.len()];

    let mut tiers = vec![SimdTier::None];
    let detected = SimdTier::detect();
    if detected != SimdTier::None {
        tiers.push(detected);
    }

    let mut group = c.benchmark_group("similarity_vector_64x1024bp");
    for tier in tiers {
        let mut lcsbp = LcsBp::new(tier);
        let mut transform = Transform::new(Measure::SimilarityDefault);
        group.bench_function(format!("{tier:?}"), |b| {
            b.iter(|| {
                similarity_vector(
                    &mut lcsbp,
                    &mut transform,
                    black_box(&reference),
                    black_box(&candidates),
                    &mut out,
                );
            });
        });
    }
    group.finish();
}

fn bench_estimate_vs_batch(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(13);
    let a = random_sequence(&mut rng, 1024);
    let b = random_sequence(&mut rng, 1024);
    let mut lcsbp = LcsBp::new(SimdTier::detect());

    let mut group = c.benchmark_group("single_pair_1024bp");
    group.bench_function("estimate", |bench| {
        bench.iter(|| lcsbp.estimate_lcs(black_box(&a), black_box(&b)));
    });
    group.bench_function("bit_parallel", |bench| {
        bench.iter(|| {
            let masks = a.compute_bit_masks();
            let mut lengths = [0u32; 4];
            lcsbp.lcs_batch(&masks, [Some(black_box(&b)), None, None, None], &mut lengths);
            lengths[0]
        });
    });
    group.finish();
}

criterion_group!(benches, bench_similarity_vector, bench_estimate_vs_batch);
criterion_main!(benches);
