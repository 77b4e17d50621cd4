// tests/engine_parity.rs
// The vector engines must agree with the scalar engine bit for bit, and
// both must satisfy the algebraic properties of LCS length.

use quadlcs::{LcsBp, Sequence, SimdTier};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_sequence(rng: &mut StdRng, len: usize) -> Sequence {
    Sequence::from_codes((0..len).map(|_| rng.gen_range(0..4u8)).collect())
}

fn lcs_naive(a: &Sequence, b: &Sequence) -> u32 {
    let mut prev = vec![0u32; b.len() + 1];
    let mut curr = vec![0u32; b.len() + 1];
    for &sa in a.symbols() {
        for (j, &sb) in b.symbols().iter().enumerate() {
            curr[j + 1] = if sa == sb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn lcs_single(lcsbp: &mut LcsBp, reference: &Sequence, candidate: &Sequence, slot: usize) -> u32 {
    let masks = reference.compute_bit_masks();
    let mut slots: [Option<&Sequence>; 4] = [None; 4];
    slots[slot] = Some(candidate);
    let mut lengths = [u32::MAX; 4];
    lcsbp.lcs_batch(&masks, slots, &mut lengths);
    lengths[slot]
}

#[test]
fn detected_tier_matches_scalar_on_random_quads() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut scalar = LcsBp::new(SimdTier::None);
    let mut vector = LcsBp::new(SimdTier::detect());

    for _ in 0..50 {
        let reference = {
            let len = rng.gen_range(1..400);
            random_sequence(&mut rng, len)
        };
        let candidates: Vec<Sequence> = (0..4)
            .map(|_| {
                let len = rng.gen_range(0..400);
                random_sequence(&mut rng, len)
            })
            .collect();

        let masks = reference.compute_bit_masks();
        let slots = [
            Some(&candidates[0]),
            Some(&candidates[1]),
            Some(&candidates[2]),
            Some(&candidates[3]),
        ];
        let mut expected = [0u32; 4];
        scalar.lcs_batch(&masks, slots, &mut expected);
        let mut actual = [0u32; 4];
        vector.lcs_batch(&masks, slots, &mut actual);
        assert_eq!(actual, expected, "tier {:?}", vector.tier());
    }
}

#[test]
fn detected_tier_matches_textbook_dp() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut lcsbp = LcsBp::new(SimdTier::detect());

    for _ in 0..30 {
        let a = {
            let len = rng.gen_range(1..150);
            random_sequence(&mut rng, len)
        };
        let b = {
            let len = rng.gen_range(1..150);
            random_sequence(&mut rng, len)
        };
        assert_eq!(lcs_single(&mut lcsbp, &a, &b, 0), lcs_naive(&a, &b));
    }
}

#[test]
fn lcs_is_invariant_under_slot_position_and_operand_order() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut lcsbp = LcsBp::new(SimdTier::detect());

    for _ in 0..20 {
        let a = {
            let len = rng.gen_range(1..200);
            random_sequence(&mut rng, len)
        };
        let b = {
            let len = rng.gen_range(1..200);
            random_sequence(&mut rng, len)
        };

        let in_slot0 = lcs_single(&mut lcsbp, &a, &b, 0);
        for slot in 1..4 {
            assert_eq!(lcs_single(&mut lcsbp, &a, &b, slot), in_slot0, "slot {slot}");
        }
        assert_eq!(lcs_single(&mut lcsbp, &b, &a, 0), in_slot0, "swapped operands");
    }
}

#[test]
fn lcs_against_self_is_the_full_length() {
    let mut rng = StdRng::seed_from_u64(23);
    for tier in [SimdTier::None, SimdTier::detect()] {
        let mut lcsbp = LcsBp::new(tier);
        for _ in 0..10 {
            let s = {
                let len = rng.gen_range(1..500);
                random_sequence(&mut rng, len)
            };
            assert_eq!(lcs_single(&mut lcsbp, &s, &s, 0), s.len() as u32);
        }
    }
}

#[test]
fn lcs_is_bounded_by_the_shorter_operand() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut lcsbp = LcsBp::new(SimdTier::detect());

    for _ in 0..30 {
        let a = {
            let len = rng.gen_range(0..300);
            random_sequence(&mut rng, len)
        };
        let b = {
            let len = rng.gen_range(0..300);
            random_sequence(&mut rng, len)
        };
        let lcs = lcs_single(&mut lcsbp, &a, &b, 0);
        assert!(lcs as usize <= a.len().min(b.len()));
    }
}

#[test]
fn absent_slots_are_never_written() {
    let mut rng = StdRng::seed_from_u64(59);
    let reference = random_sequence(&mut rng, 100);
    let candidate = random_sequence(&mut rng, 80);
    let masks = reference.compute_bit_masks();

    for tier in [SimdTier::None, SimdTier::detect()] {
        let mut lcsbp = LcsBp::new(tier);
        let mut lengths = [u32::MAX; 4];
        lcsbp.lcs_batch(&masks, [None, None, Some(&candidate), None], &mut lengths);
        assert_eq!(lengths[0], u32::MAX);
        assert_eq!(lengths[1], u32::MAX);
        assert_eq!(lengths[3], u32::MAX);
        assert!(lengths[2] <= candidate.len() as u32);
    }
}
