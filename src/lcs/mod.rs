//! Bit-parallel LCS engines and the tier-dispatch facade.
//!
//! Every engine implements the same recurrence over the reference's
//! per-symbol bit masks; they differ only in how many candidate
//! automatons they advance per register. The facade resolves the
//! requested instruction-set tier once at construction and routes quad
//! batches to the engine it retained.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod isa_avx;
#[cfg(target_arch = "x86_64")]
pub mod isa_avx2;
#[cfg(target_arch = "aarch64")]
pub mod isa_neon;

pub use scalar::LcsScalar;

#[cfg(target_arch = "x86_64")]
pub use isa_avx::LcsAvx;
#[cfg(target_arch = "x86_64")]
pub use isa_avx2::LcsAvx2;
#[cfg(target_arch = "aarch64")]
pub use isa_neon::LcsNeon;

use crate::sequence::{BitMasks, Sequence, ALPHABET_SIZE};
use crate::simd::SimdTier;

/// Mask row feeding one vector lane at candidate position `i`.
///
/// Lanes whose candidate is absent or already exhausted read the zero
/// row, which turns the recurrence into a no-op for that lane.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
#[inline(always)]
pub(crate) fn mask_row<'a>(
    masks: &'a BitMasks<'_>,
    candidate: Option<&Sequence>,
    i: usize,
    zero_row: &'a [u64],
) -> &'a [u64] {
    match candidate {
        Some(seq) if i < seq.len() => masks.row(seq.symbols()[i]),
        _ => zero_row,
    }
}

/// Backend engine retained by the facade. The variant set is closed:
/// one entry per hardware tier this crate is built for.
enum Engine {
    Scalar(LcsScalar),
    #[cfg(target_arch = "x86_64")]
    Avx(LcsAvx),
    #[cfg(target_arch = "x86_64")]
    Avx2(LcsAvx2),
    #[cfg(target_arch = "aarch64")]
    Neon(LcsNeon),
}

/// Dispatch facade over the bit-parallel LCS engines.
///
/// Constructed once per thread of control. The retained engine keeps
/// grow-only scratch across calls, so a facade must not be shared
/// between threads; callers wanting parallel similarity computation
/// build one facade per worker.
pub struct LcsBp {
    tier: SimdTier,
    engine: Engine,
}

impl LcsBp {
    /// Build a facade for the requested tier.
    ///
    /// A tier that is not compiled for this target or not available on
    /// this CPU degrades silently to the scalar engine; the downgrade
    /// is logged at debug level, never surfaced as an error.
    pub fn new(requested: SimdTier) -> Self {
        let tier = if requested.is_supported() {
            requested
        } else {
            log::debug!("{requested:?} tier unavailable on this host, using the scalar LCS engine");
            SimdTier::None
        };
        let engine = match tier {
            SimdTier::None => Engine::Scalar(LcsScalar::new()),
            #[cfg(target_arch = "x86_64")]
            SimdTier::Avx => Engine::Avx(LcsAvx::new()),
            #[cfg(target_arch = "x86_64")]
            SimdTier::Avx2 => Engine::Avx2(LcsAvx2::new()),
            #[cfg(target_arch = "aarch64")]
            SimdTier::Neon => Engine::Neon(LcsNeon::new()),
            #[cfg(not(target_arch = "x86_64"))]
            SimdTier::Avx | SimdTier::Avx2 => unreachable!("unsupported tier resolves to scalar"),
            #[cfg(not(target_arch = "aarch64"))]
            SimdTier::Neon => unreachable!("unsupported tier resolves to scalar"),
        };
        Self { tier, engine }
    }

    /// Effective tier after fallback resolution.
    pub fn tier(&self) -> SimdTier {
        self.tier
    }

    /// LCS lengths of up to four candidates against one masked
    /// reference.
    ///
    /// `None` slots are skipped: no engine work is issued for them and
    /// their entry in `lengths` is left untouched. A zero-length
    /// candidate yields 0.
    pub fn lcs_batch(
        &mut self,
        masks: &BitMasks<'_>,
        candidates: [Option<&Sequence>; 4],
        lengths: &mut [u32; 4],
    ) {
        match &mut self.engine {
            Engine::Scalar(engine) => {
                for (slot, candidate) in candidates.iter().enumerate() {
                    if let Some(candidate) = candidate {
                        lengths[slot] = engine.lcs(masks, candidate);
                    }
                }
            }
            #[cfg(target_arch = "x86_64")]
            Engine::Avx(engine) => {
                if candidates[0].is_some() || candidates[1].is_some() {
                    engine.lcs_pair(masks, [candidates[0], candidates[1]], &mut lengths[..2]);
                }
                if candidates[2].is_some() || candidates[3].is_some() {
                    engine.lcs_pair(masks, [candidates[2], candidates[3]], &mut lengths[2..]);
                }
            }
            #[cfg(target_arch = "x86_64")]
            Engine::Avx2(engine) => {
                if candidates.iter().any(Option::is_some) {
                    engine.lcs_quad(masks, candidates, lengths);
                }
            }
            #[cfg(target_arch = "aarch64")]
            Engine::Neon(engine) => {
                if candidates[0].is_some() || candidates[1].is_some() {
                    engine.lcs_pair(masks, [candidates[0], candidates[1]], &mut lengths[..2]);
                }
                if candidates[2].is_some() || candidates[3].is_some() {
                    engine.lcs_pair(masks, [candidates[2], candidates[3]], &mut lengths[2..]);
                }
            }
        }
    }

    /// Cheap LCS upper-bound estimate from symbol histograms.
    ///
    /// Runs in O(len1 + len2) without bit masks. Useful as a coarse
    /// similarity signal where the exact length is not required; may
    /// diverge from the exact value (it ignores symbol order).
    pub fn estimate_lcs(&self, a: &Sequence, b: &Sequence) -> u32 {
        let mut hist_a = [0u32; ALPHABET_SIZE];
        let mut hist_b = [0u32; ALPHABET_SIZE];
        for &s in a.symbols() {
            hist_a[s as usize] += 1;
        }
        for &s in b.symbols() {
            hist_b[s as usize] += 1;
        }
        hist_a.iter().zip(&hist_b).map(|(&x, &y)| x.min(y)).sum()
    }

    /// Exact LCS length by the classic two-row dynamic program.
    ///
    /// Diagnostic reference path, quadratic in the sequence lengths.
    #[cfg(feature = "exact-lcs")]
    pub fn exact_lcs(&self, a: &Sequence, b: &Sequence) -> u32 {
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
}
