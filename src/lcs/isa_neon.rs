//! NEON engine: two candidate automatons per 128-bit register.
//!
//! aarch64 counterpart of the AVX pair engine. NEON is baseline on
//! aarch64, so there is no runtime feature check on this path.

use std::arch::aarch64::*;

use super::mask_row;
use crate::sequence::{BitMasks, Sequence};

/// 128-bit NEON engine advancing two candidate automatons in 64-bit
/// lanes. Scratch is lane-interleaved (`state[j * 2 + k]`) and
/// grow-only.
pub struct LcsNeon {
    state: Vec<u64>,
    zero_row: Vec<u64>,
}

impl LcsNeon {
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
    pub fn lcs_pair(
        &mut self,
        masks: &BitMasks<'_>,
        candidates: [Option<&Sequence>; 2],
        out: &mut [u32],
    ) {
        unsafe { self.lcs_pair_neon(masks, candidates, out) }
    }

    #[target_feature(enable = "neon")]
    unsafe fn lcs_pair_neon(
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
            let one = vdupq_n_u64(1);

            for i in 0..longest {
                let r0 = mask_row(masks, candidates[0], i, zero_row);
                let r1 = mask_row(masks, candidates[1], i, zero_row);

                let mut carry = vdupq_n_u64(0);
                for j in 0..words {
                    let v = vld1q_u64(state.as_ptr().add(j * 2));
                    let m = vcombine_u64(vcreate_u64(r0[j]), vcreate_u64(r1[j]));
                    let tb = vandq_u64(v, m);
                    let sum = vaddq_u64(vaddq_u64(v, tb), vandq_u64(carry, one));
                    let wrapped = vcgtq_u64(v, sum);
                    carry = vorrq_u64(wrapped, vandq_u64(vceqq_u64(sum, v), carry));
                    let next = vorrq_u64(sum, vsubq_u64(v, tb));
                    vst1q_u64(state.as_mut_ptr().add(j * 2), next);
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

impl Default for LcsNeon {
    fn default() -> Self {
        Self::new()
    }
}
