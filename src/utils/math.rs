//! # Game Mathematics
//!
//! Small arithmetic helpers shared by the rules.

/// Half of `n`, rounded up.
///
/// # Examples
///
/// ```
/// use dicebound::ceil_half;
///
/// assert_eq!(ceil_half(0), 0);
/// assert_eq!(ceil_half(3), 2);
/// assert_eq!(ceil_half(4), 2);
/// ```
pub fn ceil_half(n: usize) -> usize {
    n.div_ceil(2)
}

/// Applies a signed modifier to a roll, flooring the result at `floor`.
pub fn modified_roll(roll: u32, modifier: i32, floor: u32) -> u32 {
    let total = roll as i64 + modifier as i64;
    total.max(floor as i64) as u32
}

/// Picks an index from cumulative percentage weights given a roll in `0..100`.
///
/// Weights that do not sum to 100 leave the tail mapped to the last entry.
pub fn weighted_index(weights: &[u32], roll: u32) -> usize {
    let mut threshold = 0;
    for (index, weight) in weights.iter().enumerate() {
        threshold += weight;
        if roll < threshold {
            return index;
        }
    }
    weights.len().saturating_sub(1)
}
