//! Scoring transforms from raw LCS lengths to similarity or distance
//! values.
//!
//! Every measure is a function of `(lcs, len1, len2)` with
//! `indel = len1 + len2 - 2*lcs`, the count of symbols outside the
//! common subsequence. Identical-content pairs (`indel == 0`) return a
//! large sentinel instead of dividing by zero; the sentinel magnitude
//! is a tuning constant, not a semantic infinity.

/// Sentinel returned by the harmonic and sqrt-indel measures for
/// identical-content pairs.
const IDENTICAL_SENTINEL: f64 = 100_000_000.0;

/// Floor for denominators that would otherwise vanish or go negative
/// near the identical-sequence boundary.
const DENOMINATOR_FLOOR: f64 = 1e-4;

/// Scale applied to the default and inverse measures' sentinels.
const RATIO_SENTINEL_SCALE: f64 = 1000.0;

/// Closed set of scoring measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// `lcs / indel`; `lcs * 1000` when `indel == 0`.
    SimilarityDefault,
    /// `lcs^2 / (len1 * len2)`.
    LcsSquaredByProduct,
    /// `lcs / sqrt(2 * harmonic_mean(len1, len2) - 2 * lcs)`, floored.
    LcsByHarmonicIndel,
    /// `lcs / sqrt(indel)` through a memoized reciprocal square root.
    LcsBySqrtIndel,
    /// `indel / lcs`.
    DistanceReciprocal,
    /// `-lcs / indel`; `-lcs * 1000` when `indel == 0`.
    DistanceInverse,
    /// `1 - lcs / min(len1, len2)`, uncorrected.
    DistanceByLength,
    /// Length-normalized distance divided by a multiplicative skew
    /// correction for very unequal lengths.
    DistanceByLengthCorrected,
}

/// Applies one measure and owns its memo state.
///
/// The sqrt-indel memo grows on demand and is not synchronized: each
/// concurrent consumer holds its own `Transform`.
pub struct Transform {
    measure: Measure,
    rsqrt: Vec<f64>,
}

impl Transform {
    pub fn new(measure: Measure) -> Self {
        Self {
            measure,
            rsqrt: Vec::new(),
        }
    }

    #[inline]
    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// Score a raw LCS length against the two operand lengths.
    pub fn apply(&mut self, lcs: u32, len1: u32, len2: u32) -> f64 {
        debug_assert!(lcs <= len1.min(len2));
        let indel = (len1 + len2 - 2 * lcs) as f64;
        let l = lcs as f64;

        match self.measure {
            Measure::SimilarityDefault => {
                if indel == 0.0 {
                    l * RATIO_SENTINEL_SCALE
                } else {
                    l / indel
                }
            }
            Measure::LcsSquaredByProduct => l * l / (len1 as f64 * len2 as f64),
            Measure::LcsByHarmonicIndel => {
                if indel == 0.0 {
                    return IDENTICAL_SENTINEL;
                }
                let harmonic = 1.0 / (1.0 / len1 as f64 + 1.0 / len2 as f64);
                let indel_harm = (2.0 * harmonic - 2.0 * l).max(DENOMINATOR_FLOOR);
                l / indel_harm.sqrt()
            }
            Measure::LcsBySqrtIndel => {
                if indel == 0.0 {
                    return IDENTICAL_SENTINEL;
                }
                let indel = (len1 + len2 - 2 * lcs) as usize;
                self.ensure_rsqrt(indel);
                l * self.rsqrt[indel]
            }
            Measure::DistanceReciprocal => indel / l,
            Measure::DistanceInverse => {
                if indel == 0.0 {
                    -l * RATIO_SENTINEL_SCALE
                } else {
                    -l / indel
                }
            }
            Measure::DistanceByLength => 1.0 - l / len1.min(len2) as f64,
            Measure::DistanceByLengthCorrected => {
                let (longer, shorter) = if len1 >= len2 {
                    (len1 as f64, len2 as f64)
                } else {
                    (len2 as f64, len1 as f64)
                };
                let d = 1.0 - l / shorter;
                d / length_skew_correction(longer, shorter)
            }
        }
    }

    /// Extend the `1/sqrt(k)` memo so `indel` is a valid index.
    fn ensure_rsqrt(&mut self, indel: usize) {
        if indel >= self.rsqrt.len() {
            for k in self.rsqrt.len()..=indel {
                self.rsqrt.push(1.0 / (k as f64).sqrt());
            }
        }
    }
}

/// MAFFT-style correction compensating the systematic LCS-ratio bias
/// between sequences of very unequal length.
#[inline]
fn length_skew_correction(longer: f64, shorter: f64) -> f64 {
    shorter / longer * 0.1 + 10_000.0 / (longer + 10_000.0) + 0.01
}
