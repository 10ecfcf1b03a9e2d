//! Bit-level primitives shared by every rank-dictionary variant in
//! [`crate::rank`].
//!
//! Rank dictionaries encode a symbol stream as `k = ceil(log2(sigma))`
//! bitplanes and need, for a given target value `v`, the bitmask that is `1`
//! exactly where the `k` bitplanes together encode `v` (or `<= v`). Deriving
//! that mask from `k` bitplanes is a `k`-input boolean function; this module
//! provides it generically over any bitplane count by composing pairwise
//! AND/XOR/NOT, which is the portable fallback the spec requires (no stable
//! hardware 3-input select exists in Rust today).

/// Popcount of a single word. A thin wrapper so callers don't need to
/// remember which intrinsic to reach for.
#[inline(always)]
pub fn popcount64(word: u64) -> u32 {
    word.count_ones()
}

/// Popcount over a slice of words, i.e. a bitset of `64 * words.len()` bits.
#[inline]
pub fn popcount_words(words: &[u64]) -> usize {
    words.iter().map(|&w| w.count_ones() as usize).sum()
}

/// The 3-input boolean function `f(a, b, c)` whose truth table is the 8 bits
/// of `truth_table` (bit `4*a + 2*b + c` of `truth_table` gives the output
/// for that combination of inputs), applied bitwise/elementwise across three
/// equal-length bitsets.
///
/// This is the portable fallback composing AND/OR/XOR/NOT described in
/// spec.md §9; any platform offering a hardware 3-input LUT instruction can
/// special-case this function without changing its contract.
pub fn ternary(truth_table: u8, a: &[u64], b: &[u64], c: &[u64]) -> Vec<u64> {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), c.len());

    a.iter()
        .zip(b)
        .zip(c)
        .map(|((&a, &b), &c)| ternary_word(truth_table, a, b, c))
        .collect()
}

/// Single-word version of [`ternary`], built from the minterms of
/// `truth_table`. Composes at most 7 bitwise ops, as required by spec.md
/// §4.1.
#[inline]
pub fn ternary_word(truth_table: u8, a: u64, b: u64, c: u64) -> u64 {
    let mut result = 0u64;
    for bit_index in 0..8u8 {
        if (truth_table >> bit_index) & 1 == 0 {
            continue;
        }
        let a_term = if bit_index & 0b100 != 0 { a } else { !a };
        let b_term = if bit_index & 0b010 != 0 { b } else { !b };
        let c_term = if bit_index & 0b001 != 0 { c } else { !c };
        result |= a_term & b_term & c_term;
    }
    result
}

/// For every position `j`, the integer encoded across `bitplanes` (MSB-first,
/// i.e. `bitplanes[0]` is the most significant bit) at position `j`.
fn decode_value_at(bitplanes: &[&[u64]], word_index: usize, bit_index: u32) -> u64 {
    let mut value = 0u64;
    for plane in bitplanes {
        let bit = (plane[word_index] >> bit_index) & 1;
        value = (value << 1) | bit;
    }
    value
}

/// Returns the bitset whose `j`-th bit is `1` iff the integer encoded by
/// `bitplanes` at position `j` equals `v`.
///
/// `bitplanes[0]` is the most significant bit, matching how
/// [`crate::rank::epr`] lays out its planes. Must agree bit-for-bit with a
/// naive per-position decode-and-compare (this is checked in tests and is
/// the EPR family's core correctness requirement).
pub fn mark_exact(v: u64, bitplanes: &[&[u64]]) -> Vec<u64> {
    mark(v, bitplanes, false)
}

/// As [`mark_exact`], but marks positions whose encoded value is `<= v`.
pub fn mark_exact_or_less(v: u64, bitplanes: &[&[u64]]) -> Vec<u64> {
    mark(v, bitplanes, true)
}

/// `f(a, b, c) = a & b & c`, used to AND-fold equality terms two at a time
/// (the running accumulator takes slot `a`, the next two terms take `b`/`c`).
const AND3: u8 = 0b1000_0000;

/// `f(lt, eq, plane) = lt | (eq & !plane)`: folds one more bitplane into the
/// running "strictly less than the prefix of `v` seen so far" mask.
const LT_STEP: u8 = 0b1111_0100;

/// Builds the match mask one word at a time by composing whole bitplane
/// words through [`ternary_word`], rather than decoding each of the 64 bit
/// positions in a word individually: `k = bitplanes.len()` word operations
/// per word, not `k` operations per bit.
fn mark(v: u64, bitplanes: &[&[u64]], or_less: bool) -> Vec<u64> {
    if bitplanes.is_empty() {
        return Vec::new();
    }
    let k = bitplanes.len();
    let num_words = bitplanes[0].len();
    let mut out = vec![0u64; num_words];

    for (word_index, slot) in out.iter_mut().enumerate() {
        if or_less {
            // MSB-first scan, tracking "equal to v's prefix so far" (`eq`)
            // and "already strictly less than v" (`lt`); the final mask is
            // their union.
            let mut eq = u64::MAX;
            let mut lt = 0u64;
            for (i, plane) in bitplanes.iter().enumerate() {
                let bit = (v >> (k - 1 - i)) & 1;
                let plane_word = plane[word_index];
                if bit == 1 {
                    lt = ternary_word(LT_STEP, lt, eq, plane_word);
                    eq &= plane_word;
                } else {
                    eq &= !plane_word;
                }
            }
            *slot = lt | eq;
        } else {
            // AND-fold the per-plane equality terms (`plane` if `v`'s bit is
            // 1, `!plane` otherwise), two terms per `ternary_word` call.
            let terms: Vec<u64> = bitplanes
                .iter()
                .enumerate()
                .map(|(i, plane)| {
                    let bit = (v >> (k - 1 - i)) & 1;
                    let plane_word = plane[word_index];
                    if bit == 1 { plane_word } else { !plane_word }
                })
                .collect();

            let mut acc = u64::MAX;
            for chunk in terms.chunks(2) {
                acc = match chunk {
                    [a, b] => ternary_word(AND3, acc, *a, *b),
                    [a] => ternary_word(AND3, acc, *a, u64::MAX),
                    _ => unreachable!("chunks(2) never yields more than 2 elements"),
                };
            }
            *slot = acc;
        }
    }

    out
}

/// Returns [`mark_exact`] for every `v` in `0..2^bitplanes.len()`, packed
/// into one `Vec` indexed by `v`. Used by rank dictionaries that precompute
/// every symbol's mask once per block rather than re-deriving it per query.
pub fn mark_exact_all(bitplanes: &[&[u64]]) -> Vec<Vec<u64>> {
    let num_values = 1usize << bitplanes.len();
    (0..num_values as u64)
        .map(|v| mark_exact(v, bitplanes))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_mark(v: u64, bitplanes: &[&[u64]], or_less: bool) -> Vec<u64> {
        let num_words = bitplanes[0].len();
        let mut out = vec![0u64; num_words];
        for word_index in 0..num_words {
            for bit_index in 0..64u32 {
                let value = decode_value_at(bitplanes, word_index, bit_index);
                let hit = if or_less { value <= v } else { value == v };
                if hit {
                    out[word_index] |= 1 << bit_index;
                }
            }
        }
        out
    }

    #[test]
    fn ternary_and_matches_hardware_and() {
        let a = [0b1010u64];
        let b = [0b1100u64];
        let c = [0b1111u64];
        // truth table for a & b (ignoring c): output 1 only when a=1,b=1
        // minterms: (1,1,0) and (1,1,1) -> bits 6 and 7
        let truth_table = 0b1100_0000;
        let result = ternary(truth_table, &a, &b, &c);
        assert_eq!(result[0], a[0] & b[0]);
    }

    #[test]
    fn mark_exact_matches_naive_for_three_bitplanes() {
        let plane_hi = [0b1100_1010u64];
        let plane_mid = [0b1010_0110u64];
        let plane_lo = [0b0110_1100u64];
        let planes: [&[u64]; 3] = [&plane_hi, &plane_mid, &plane_lo];

        for v in 0..8u64 {
            assert_eq!(mark_exact(v, &planes), naive_mark(v, &planes, false));
            assert_eq!(
                mark_exact_or_less(v, &planes),
                naive_mark(v, &planes, true)
            );
        }
    }

    #[test]
    fn mark_exact_all_matches_individual_calls() {
        let plane_hi = [0xF0F0_F0F0_F0F0_F0F0u64];
        let plane_lo = [0x0F0F_0F0F_0F0F_0F0Fu64];
        let planes: [&[u64]; 2] = [&plane_hi, &plane_lo];

        let all = mark_exact_all(&planes);
        for v in 0..4u64 {
            assert_eq!(all[v as usize], mark_exact(v, &planes));
        }
    }

    #[test]
    fn popcount_words_sums_across_words() {
        let words = [u64::MAX, 0, 0b101];
        assert_eq!(popcount_words(&words), 64 + 0 + 2);
    }
}
