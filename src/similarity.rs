//! Batch orchestration: vector, range, and matrix similarity passes.
//!
//! All three drive the dispatch facade in groups of four candidates
//! against one reference whose bit masks are built exactly once per
//! pass and released when the pass leaves scope. Scores land in
//! caller-owned buffers; the full-matrix pass uses a packed
//! strictly-lower-triangular layout.

use rayon::prelude::*;

use crate::lcs::LcsBp;
use crate::measures::{Measure, Transform};
use crate::sequence::Sequence;
use crate::simd::SimdTier;

/// Offset of entry `(row, col)`, `col < row`, in the packed
/// strictly-lower-triangular layout. No diagonal, no mirrored half.
#[inline]
pub fn packed_offset(row: usize, col: usize) -> usize {
    debug_assert!(
        col < row,
        "packed storage holds only the strict lower triangle"
    );
    row * (row - 1) / 2 + col
}

/// Number of packed entries for an `n`-sequence matrix.
#[inline]
pub fn packed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Scores of one reference against a contiguous run of candidates.
///
/// Full quads go to the facade as-is; a final partial quad of
/// `n mod 4` candidates is padded with empty slots, which produce no
/// engine work and no output. One score per candidate is written to
/// `out[..candidates.len()]`.
pub fn similarity_vector(
    lcsbp: &mut LcsBp,
    transform: &mut Transform,
    reference: &Sequence,
    candidates: &[Sequence],
    out: &mut [f64],
) {
    assert!(
        out.len() >= candidates.len(),
        "output buffer shorter than candidate run"
    );

    let masks = reference.compute_bit_masks();
    let ref_len = reference.len() as u32;
    let mut lcs_lens = [0u32; 4];

    let n_full = candidates.len() / 4 * 4;
    for (quad_idx, quad) in candidates[..n_full].chunks_exact(4).enumerate() {
        lcsbp.lcs_batch(
            &masks,
            [Some(&quad[0]), Some(&quad[1]), Some(&quad[2]), Some(&quad[3])],
            &mut lcs_lens,
        );
        for (k, candidate) in quad.iter().enumerate() {
            out[quad_idx * 4 + k] = transform.apply(lcs_lens[k], ref_len, candidate.len() as u32);
        }
    }

    let tail = &candidates[n_full..];
    if !tail.is_empty() {
        let mut slots: [Option<&Sequence>; 4] = [None; 4];
        for (k, candidate) in tail.iter().enumerate() {
            slots[k] = Some(candidate);
        }
        lcsbp.lcs_batch(&masks, slots, &mut lcs_lens);
        for (k, candidate) in tail.iter().enumerate() {
            out[n_full + k] = transform.apply(lcs_lens[k], ref_len, candidate.len() as u32);
        }
    }
    // masks drop here: the paired release, on every exit path
}

/// Scores of one reference against candidates selected by index.
///
/// Same contract as [`similarity_vector`] with one deliberate
/// difference: the final partial quad is padded by repeating its first
/// index, so the engine always sees a full-width batch, and the
/// repeated outputs are discarded. Only the requested indices are
/// written.
pub fn similarity_range(
    lcsbp: &mut LcsBp,
    transform: &mut Transform,
    reference: &Sequence,
    sequences: &[Sequence],
    ids: &[usize],
    out: &mut [f64],
) {
    assert!(
        out.len() >= ids.len(),
        "output buffer shorter than index range"
    );

    let masks = reference.compute_bit_masks();
    let ref_len = reference.len() as u32;
    let mut lcs_lens = [0u32; 4];

    let n_full = ids.len() / 4 * 4;
    for (quad_idx, quad) in ids[..n_full].chunks_exact(4).enumerate() {
        lcsbp.lcs_batch(
            &masks,
            [
                Some(&sequences[quad[0]]),
                Some(&sequences[quad[1]]),
                Some(&sequences[quad[2]]),
                Some(&sequences[quad[3]]),
            ],
            &mut lcs_lens,
        );
        for (k, &id) in quad.iter().enumerate() {
            out[quad_idx * 4 + k] =
                transform.apply(lcs_lens[k], ref_len, sequences[id].len() as u32);
        }
    }

    let tail = &ids[n_full..];
    if !tail.is_empty() {
        // unused slots repeat the first tail index; their outputs are
        // thrown away below
        let mut slots = [Some(&sequences[tail[0]]); 4];
        for (k, &id) in tail.iter().enumerate() {
            slots[k] = Some(&sequences[id]);
        }
        lcsbp.lcs_batch(&masks, slots, &mut lcs_lens);
        for (k, &id) in tail.iter().enumerate() {
            out[n_full + k] = transform.apply(lcs_lens[k], ref_len, sequences[id].len() as u32);
        }
    }
}

/// Full pairwise matrix into the packed strictly-lower-triangular
/// layout.
///
/// Row `i` is scored against rows `0..i` exactly once, exploiting
/// symmetry; entry `(i, j)` lands at [`packed_offset`]`(i, j)`. Row 0
/// performs no comparisons.
pub fn similarity_matrix(
    lcsbp: &mut LcsBp,
    transform: &mut Transform,
    sequences: &[Sequence],
    out_matrix: &mut [f64],
) {
    assert!(
        out_matrix.len() >= packed_len(sequences.len()),
        "output buffer shorter than the packed triangle"
    );

    for row in 0..sequences.len() {
        let offset = packed_len(row);
        similarity_vector(
            lcsbp,
            transform,
            &sequences[row],
            &sequences[..row],
            &mut out_matrix[offset..offset + row],
        );
    }
}

/// Matrix pass with rows distributed over the rayon pool.
///
/// Facades and transforms carry unsynchronized mutable state, so each
/// worker gets its own pair; the packed output is split into disjoint
/// per-row slices up front. Scores are identical to
/// [`similarity_matrix`].
pub fn similarity_matrix_parallel(
    tier: SimdTier,
    measure: Measure,
    sequences: &[Sequence],
    out_matrix: &mut [f64],
) {
    let n = sequences.len();
    assert!(
        out_matrix.len() >= packed_len(n),
        "output buffer shorter than the packed triangle"
    );

    let mut rows: Vec<&mut [f64]> = Vec::with_capacity(n);
    let mut rest = &mut out_matrix[..packed_len(n)];
    for row in 0..n {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(row);
        rows.push(head);
        rest = tail;
    }

    rows.into_par_iter().enumerate().for_each_init(
        || (LcsBp::new(tier), Transform::new(measure)),
        |(lcsbp, transform), (row, out_row)| {
            similarity_vector(lcsbp, transform, &sequences[row], &sequences[..row], out_row);
        },
    );
}
