//! Encoded sequences and their on-demand bit-mask representation.
//!
//! The similarity core borrows sequences for the duration of a call and
//! never owns their storage. When a sequence acts as the reference of a
//! batch, the bit-parallel automaton needs one match bit-vector per
//! alphabet symbol; those masks are expensive relative to their use
//! count, so they are built per batch pass and dropped when the pass
//! ends instead of staying resident.

use std::fmt::{self, Write};

/// Number of distinct symbol codes (A, C, G, T, N).
pub const ALPHABET_SIZE: usize = 5;

/// Bits per state word of the bit-parallel automaton.
pub(crate) const WORD_BITS: usize = 64;

/// Convert an ASCII nucleotide to its code (A=0, C=1, G=2, T=3, other=4).
#[inline(always)]
pub const fn encode_base(c: u8) -> u8 {
    match c {
        b'A' | b'a' => 0,
        b'C' | b'c' => 1,
        b'G' | b'g' => 2,
        b'T' | b't' => 3,
        _ => 4,
    }
}

/// Convert a symbol code back to its ASCII character.
#[inline(always)]
pub const fn base_to_char(b: u8) -> char {
    match b {
        0 => 'A',
        1 => 'C',
        2 => 'G',
        3 => 'T',
        _ => 'N',
    }
}

/// An immutable encoded sequence with a cached length.
#[derive(Clone, PartialEq, Eq)]
pub struct Sequence {
    symbols: Vec<u8>,
}

impl Sequence {
    /// Encode an ASCII sequence. Bytes outside `ACGTacgt` map to `N`.
    pub fn from_ascii(text: &[u8]) -> Self {
        Self {
            symbols: text.iter().map(|&c| encode_base(c)).collect(),
        }
    }

    /// Build a sequence from already-encoded symbol codes.
    pub fn from_codes(symbols: Vec<u8>) -> Self {
        debug_assert!(symbols.iter().all(|&s| (s as usize) < ALPHABET_SIZE));
        Self { symbols }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Build the per-symbol bit masks used when this sequence is the
    /// reference of a batch.
    ///
    /// The returned value borrows `self`, so the sequence cannot be
    /// mutated or dropped while the masks are live; dropping the value
    /// is the paired release. Batch drivers create the masks once per
    /// reference and let scope end them on every exit path.
    pub fn compute_bit_masks(&self) -> BitMasks<'_> {
        BitMasks::build(self)
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sequence(")?;
        for &s in &self.symbols {
            f.write_char(base_to_char(s))?;
        }
        f.write_str(")")
    }
}

/// Per-symbol match masks of one reference sequence, packed into `u64`
/// words. Row `s` has bit `i` set iff `reference[i] == s`.
pub struct BitMasks<'s> {
    reference: &'s Sequence,
    word_count: usize,
    words: Vec<u64>,
}

impl<'s> BitMasks<'s> {
    fn build(reference: &'s Sequence) -> Self {
        let word_count = reference.len().div_ceil(WORD_BITS);
        let mut words = vec![0u64; ALPHABET_SIZE * word_count];
        for (i, &symbol) in reference.symbols().iter().enumerate() {
            words[symbol as usize * word_count + i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
        }
        Self {
            reference,
            word_count,
            words,
        }
    }

    /// The sequence these masks were built from.
    #[inline]
    pub fn reference(&self) -> &'s Sequence {
        self.reference
    }

    /// State-row width in 64-bit words.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Match words for one symbol code.
    #[inline]
    pub fn row(&self, symbol: u8) -> &[u64] {
        let start = symbol as usize * self.word_count;
        &self.words[start..start + self.word_count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_ascii_case_insensitively() {
        let s = Sequence::from_ascii(b"ACGTacgtNX");
        assert_eq!(s.symbols(), &[0, 1, 2, 3, 0, 1, 2, 3, 4, 4]);
        assert_eq!(s.len(), 10);
    }

    #[test]
    fn mask_rows_partition_reference_positions() {
        let s = Sequence::from_ascii(b"ACGTA");
        let masks = s.compute_bit_masks();
        assert_eq!(masks.word_count(), 1);
        assert_eq!(masks.row(0)[0], 0b10001); // A at positions 0 and 4
        assert_eq!(masks.row(1)[0], 0b00010);
        assert_eq!(masks.row(2)[0], 0b00100);
        assert_eq!(masks.row(3)[0], 0b01000);
        assert_eq!(masks.row(4)[0], 0);
    }

    #[test]
    fn masks_span_multiple_words() {
        let s = Sequence::from_codes(vec![0; 130]);
        let masks = s.compute_bit_masks();
        assert_eq!(masks.word_count(), 3);
        assert_eq!(masks.row(0), &[u64::MAX, u64::MAX, 0b11]);
        assert_eq!(masks.row(1), &[0, 0, 0]);
    }

    #[test]
    fn empty_sequence_has_no_mask_words() {
        let s = Sequence::from_ascii(b"");
        let masks = s.compute_bit_masks();
        assert_eq!(masks.word_count(), 0);
    }
}
