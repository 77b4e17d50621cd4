//! Quad-batched bit-parallel LCS similarity kernels.
//!
//! Computes pairwise similarity and distance scores between nucleotide
//! sequences, the quantity a guide-tree builder clusters on before
//! progressive multiple-sequence alignment. The hot path advances a
//! bit-parallel LCS automaton for four candidate sequences per call,
//! with scalar, AVX, AVX2, and NEON engines behind a dispatch facade
//! selected by instruction-set tier at construction time.
//!
//! The batch drivers in [`similarity`] turn per-quad LCS lengths into
//! complete score vectors and symmetry-packed matrices, building each
//! reference's bit masks exactly once per pass and releasing them when
//! the pass ends.
//!
//! ```
//! use quadlcs::{similarity_vector, LcsBp, Measure, Sequence, SimdTier, Transform};
//!
//! let reference = Sequence::from_ascii(b"ACGT");
//! let candidates = vec![Sequence::from_ascii(b"AGT")];
//!
//! let mut lcsbp = LcsBp::new(SimdTier::detect());
//! let mut transform = Transform::new(Measure::SimilarityDefault);
//! let mut scores = [0.0];
//! similarity_vector(&mut lcsbp, &mut transform, &reference, &candidates, &mut scores);
//! assert_eq!(scores[0], 3.0); // lcs 3, one unmatched symbol
//! ```

pub mod lcs;
pub mod measures;
pub mod sequence;
pub mod similarity;
pub mod simd;

pub use lcs::LcsBp;
pub use measures::{Measure, Transform};
pub use sequence::{BitMasks, Sequence};
pub use similarity::{
    packed_len, packed_offset, similarity_matrix, similarity_matrix_parallel, similarity_range,
    similarity_vector,
};
pub use simd::SimdTier;
