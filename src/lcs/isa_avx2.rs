//! AVX2 engine: four candidate automatons per 256-bit register.

use std::arch::x86_64::*;

use super::mask_row;
use crate::sequence::{BitMasks, Sequence};

/// 256-bit engine advancing four candidate automatons in 64-bit lanes.
///
/// Scratch is lane-interleaved: state word `j` of lane `k` lives at
/// `state[j * 4 + k]`. Exhausted and absent lanes read from the zero
/// mask row, which leaves their lane untouched (zero match word, zero
/// carry).
pub struct LcsAvx2 {
    state: Vec<u64>,
    zero_row: Vec<u64>,
}

impl LcsAvx2 {
    pub fn new() -> Self {
        Self {
            state: Vec::new(),
            zero_row: Vec::new(),
        }
    }

    fn ensure_width(&mut self, words: usize) {
        if self.zero_row.len() < words {
            self.state.resize(words * 4, 0);
            self.zero_row.resize(words, 0);
        }
    }

    /// LCS lengths for up to four candidates against the masked
    /// reference. `None` slots are not written.
    ///
    /// The facade verifies AVX2 availability before constructing this
    /// engine, which makes the inner `target_feature` call sound.
    pub fn lcs_quad(
        &mut self,
        masks: &BitMasks<'_>,
        candidates: [Option<&Sequence>; 4],
        out: &mut [u32; 4],
    ) {
        unsafe { self.lcs_quad_avx2(masks, candidates, out) }
    }

    #[target_feature(enable = "avx2")]
    unsafe fn lcs_quad_avx2(
        &mut self,
        masks: &BitMasks<'_>,
        candidates: [Option<&Sequence>; 4],
        out: &mut [u32; 4],
    ) {
        let words = masks.word_count();
        self.ensure_width(words);
        let zero_row = &self.zero_row[..words];
        let state = &mut self.state[..words * 4];
        state.fill(u64::MAX);

        let longest = candidates
            .iter()
            .flatten()
            .map(|s| s.len())
            .max()
            .unwrap_or(0);

        unsafe {
            let one = _mm256_set1_epi64x(1);
            let sign = _mm256_set1_epi64x(i64::MIN);

            for i in 0..longest {
                let r0 = mask_row(masks, candidates[0], i, zero_row);
                let r1 = mask_row(masks, candidates[1], i, zero_row);
                let r2 = mask_row(masks, candidates[2], i, zero_row);
                let r3 = mask_row(masks, candidates[3], i, zero_row);

                let mut carry = _mm256_setzero_si256();
                for j in 0..words {
                    let v = _mm256_loadu_si256(state.as_ptr().add(j * 4) as *const __m256i);
                    let m = _mm256_set_epi64x(
                        r3[j] as i64,
                        r2[j] as i64,
                        r1[j] as i64,
                        r0[j] as i64,
                    );
                    let tb = _mm256_and_si256(v, m);
                    let sum = _mm256_add_epi64(
                        _mm256_add_epi64(v, tb),
                        _mm256_and_si256(carry, one),
                    );
                    // unsigned lane carry: sum wrapped below v, or landed
                    // exactly on v while a carry came in
                    let wrapped = _mm256_cmpgt_epi64(
                        _mm256_xor_si256(v, sign),
                        _mm256_xor_si256(sum, sign),
                    );
                    carry = _mm256_or_si256(
                        wrapped,
                        _mm256_and_si256(_mm256_cmpeq_epi64(sum, v), carry),
                    );
                    let next = _mm256_or_si256(sum, _mm256_sub_epi64(v, tb));
                    _mm256_storeu_si256(state.as_mut_ptr().add(j * 4) as *mut __m256i, next);
                }
            }
        }

        for (lane, slot) in candidates.iter().enumerate() {
            if slot.is_none() {
                continue;
            }
            out[lane] = (0..words).map(|j| state[j * 4 + lane].count_zeros()).sum();
        }
    }
}

impl Default for LcsAvx2 {
    fn default() -> Self {
        Self::new()
    }
}
