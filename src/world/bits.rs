//! Version-dependent bit-packed block-index decoding (spec §4.1).
//!
//! Both routines return a palette index in `[0, 2^bits_per_index)` for block
//! `i` of a section's 4096 indices. `bits_per_index` is `max(4, ceil(log2(P)))`
//! for a palette of size `P`; callers compute it once per section.

/// `L = max(4, ceil(log2(palette_len)))`. A palette of size 1 or 0 still
/// gets the minimum width of 4 (spec open question: sections with no
/// `BlockStates` at all are handled by the caller, not here).
pub fn bits_per_index(palette_len: usize) -> u32 {
    let mut bits = 4;
    while palette_len > (1usize << bits) {
        bits += 1;
    }
    bits
}

/// Pre-1.16 (DataVersion < 2534): one contiguous little-endian bitstream of
/// `bits * 4096` bits, indices allowed to straddle a 64-bit word boundary.
pub fn block_at_pre_116(block_states: &[i64], index: usize, bits: u32) -> u32 {
    let pos = index as u64 * bits as u64;
    let skip_longs = (pos >> 6) as usize;
    let padding = (pos & 63) as u32;
    let mask: u64 = (1u64 << bits) - 1;

    let word = block_states[skip_longs] as u64;
    let mut value = (word >> padding) & mask;

    let overflow = padding as i32 + bits as i32 - 64;
    if overflow > 0 {
        let next_word = block_states[skip_longs + 1] as u64;
        let upper = next_word & ((1u64 << overflow) - 1);
        value |= upper << (bits - overflow as u32);
    }
    value as u32
}

/// Post-1.16 (DataVersion >= 2534): each word holds `floor(64/bits)` indices,
/// padded, never straddling a word boundary.
pub fn block_at_post_116(block_states: &[i64], index: usize, bits: u32) -> u32 {
    let blocks_per_word = 64 / bits as usize;
    let word_index = index / blocks_per_word;
    let shift = (index % blocks_per_word) as u32 * bits;
    let word = block_states[word_index] as u64;
    let mask: u64 = (1u64 << bits) - 1;
    ((word >> shift) & mask) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_pre_116(indices: &[u32], bits: u32) -> Vec<i64> {
        let total_bits = indices.len() as u64 * bits as u64;
        let n_words = total_bits.div_ceil(64) as usize;
        let mut words = vec![0u64; n_words.max(1)];
        let mut pos: u64 = 0;
        for &idx in indices {
            let skip = (pos >> 6) as usize;
            let padding = (pos & 63) as u32;
            words[skip] |= (idx as u64) << padding;
            let overflow = padding as i32 + bits as i32 - 64;
            if overflow > 0 {
                words[skip + 1] |= (idx as u64) >> (bits - overflow as u32);
            }
            pos += bits as u64;
        }
        words.into_iter().map(|w| w as i64).collect()
    }

    fn pack_post_116(indices: &[u32], bits: u32) -> Vec<i64> {
        let blocks_per_word = 64 / bits as usize;
        let n_words = indices.len().div_ceil(blocks_per_word);
        let mut words = vec![0u64; n_words.max(1)];
        for (i, &idx) in indices.iter().enumerate() {
            let word_index = i / blocks_per_word;
            let shift = (i % blocks_per_word) as u32 * bits;
            words[word_index] |= (idx as u64) << shift;
        }
        words.into_iter().map(|w| w as i64).collect()
    }

    #[test]
    fn bits_per_index_matches_spec() {
        assert_eq!(bits_per_index(1), 4);
        assert_eq!(bits_per_index(16), 4);
        assert_eq!(bits_per_index(17), 5);
        assert_eq!(bits_per_index(256), 8);
        assert_eq!(bits_per_index(257), 9);
    }

    #[test]
    fn pre_116_round_trips_with_word_crossing() {
        let bits = 5u32; // guarantees crossings, 64 is not divisible by 5
        let indices: Vec<u32> = (0..4096u32).map(|i| i % (1 << bits)).collect();
        let words = pack_pre_116(&indices, bits);
        for (i, &expect) in indices.iter().enumerate() {
            assert_eq!(block_at_pre_116(&words, i, bits), expect, "index {i}");
        }
    }

    #[test]
    fn post_116_round_trips_without_crossing() {
        let bits = 4u32;
        let indices: Vec<u32> = (0..4096u32).map(|i| i % (1 << bits)).collect();
        let words = pack_post_116(&indices, bits);
        for (i, &expect) in indices.iter().enumerate() {
            assert_eq!(block_at_post_116(&words, i, bits), expect, "index {i}");
        }
    }

    #[test]
    fn both_schemes_agree_on_same_logical_indices() {
        let bits = bits_per_index(9);
        assert_eq!(bits, 4);
        let indices: Vec<u32> = (0..4096u32).map(|i| i % 9).collect();
        let pre = pack_pre_116(&indices, bits);
        let post = pack_post_116(&indices, bits);
        for i in 0..4096 {
            assert_eq!(block_at_pre_116(&pre, i, bits), block_at_post_116(&post, i, bits));
        }
    }
}
