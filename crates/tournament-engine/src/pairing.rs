//! Round-robin pairing generation
//!
//! Pairings are ordered `(seat_1, seat_2)` index pairs into the roster. Every
//! player meets every other player in both seat orders; self-pairings
//! `(i, i)` are included only when self-play is enabled. Equal strategies at
//! different roster positions are distinct players and always meet.

/// Generate all pairings in row-major order
///
/// # Arguments
/// * `player_count` - Number of roster entries
/// * `self_plays` - Whether a player also meets itself
///
/// # Returns
/// Vector of `(index_1, index_2)` pairs, ordered by `index_1` then `index_2`
pub fn generate_all_pairings(player_count: usize, self_plays: bool) -> Vec<(usize, usize)> {
    let mut pairings = Vec::with_capacity(calculate_match_count(player_count, self_plays));
    for a in 0..player_count {
        for b in 0..player_count {
            if a != b || self_plays {
                pairings.push((a, b));
            }
        }
    }
    pairings
}

/// Total number of matches in O(1), no allocation
///
/// `n²` with self-play, `n(n−1)` without.
pub fn calculate_match_count(player_count: usize, self_plays: bool) -> usize {
    player_count * matches_per_player(player_count, self_plays)
}

/// Opponents each player faces: `n` with self-play, `n−1` without
pub fn matches_per_player(player_count: usize, self_plays: bool) -> usize {
    if self_plays {
        player_count
    } else {
        player_count.saturating_sub(1)
    }
}
