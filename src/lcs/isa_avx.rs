//! AVX engine: two candidate automatons per 128-bit register.
//!
//! Same recurrence as the scalar engine, run for a pair of candidates
//! in the two 64-bit lanes of a VEX-encoded 128-bit register. The
//! facade issues two pair calls to cover a quad.

use std::arch::x86_64::*;

use super::mask_row;
use crate::sequence::{BitMasks, Sequence};

/// 128-bit engine advancing two candidate automatons in 64-bit lanes.
///
/// Scratch is lane-interleaved (`state[j * 2 + k]`) and grow-only.
pub struct LcsAvx {
    state: Vec<u64>,
    zero_row: Vec<u64>,
}

impl LcsAvx {
    pub fn new() -> Self {
        Self {
            state: Vec::new(),
            zero_row: Vec::new(),
        }
    }

    fn ensure_width(&mut self, words: usize) {
        if self.zero_row.len() < words {
            self.state.resize(words * 2, 0);
            self.zero_row.resize(words, 0);
        }
    }

    /// LCS lengths for up to two candidates against the masked
    /// reference, written to `out[0..2]`. `None` slots are not written.
    ///
    /// The facade verifies AVX availability before constructing this
    /// engine; AVX implies the 64-bit lane compares used below.
    pub fn lcs_pair(
        &mut self,
        masks: &BitMasks<'_>,
        candidates: [Option<&Sequence>; 2],
        out: &mut [u32],
    ) {
        unsafe { self.lcs_pair_avx(masks, candidates, out) }
    }

    #[target_feature(enable = "avx")]
    unsafe fn lcs_pair_avx(
        &mut self,
        masks: &BitMasks<'_>,
        candidates: [Option<&Sequence>; 2],
        out: &mut [u32],
    ) {
        let words = masks.word_count();
        self.ensure_width(words);
        let zero_row = &self.zero_row[..words];
        let state = &mut self.state[..words * 2];
        state.fill(u64::MAX);

        let longest = candidates
            .iter()
            .flatten()
            .map(|s| s.len())
            .max()
            .unwrap_or(0);

        unsafe {
            let one = _mm_set1_epi64x(1);
            let sign = _mm_set1_epi64x(i64::MIN);

            for i in 0..longest {
                let r0 = mask_row(masks, candidates[0], i, zero_row);
                let r1 = mask_row(masks, candidates[1], i, zero_row);

                let mut carry = _mm_setzero_si128();
                for j in 0..words {
                    let v = _mm_loadu_si128(state.as_ptr().add(j * 2) as *const __m128i);
                    let m = _mm_set_epi64x(r1[j] as i64, r0[j] as i64);
                    let tb = _mm_and_si128(v, m);
                    let sum = _mm_add_epi64(_mm_add_epi64(v, tb), _mm_and_si128(carry, one));
                    let wrapped =
                        _mm_cmpgt_epi64(_mm_xor_si128(v, sign), _mm_xor_si128(sum, sign));
                    carry = _mm_or_si128(wrapped, _mm_and_si128(_mm_cmpeq_epi64(sum, v), carry));
                    let next = _mm_or_si128(sum, _mm_sub_epi64(v, tb));
                    _mm_storeu_si128(state.as_mut_ptr().add(j * 2) as *mut __m128i, next);
                }
            }
        }

        for (lane, slot) in candidates.iter().enumerate() {
            if slot.is_none() {
                continue;
            }
            out[lane] = (0..words).map(|j| state[j * 2 + lane].count_zeros()).sum();
        }
    }
}

impl Default for LcsAvx {
    fn default() -> Self {
        Self::new()
    }
}
