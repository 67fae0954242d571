//! Score to level derivation.

/// Level reached once the score meets each threshold, lowest first
pub const LEVEL_THRESHOLDS: [(u64, u32); 4] = [(100, 2), (500, 3), (1000, 4), (2000, 5)];

/// Level for a score with no thresholds met
pub const BASE_LEVEL: u32 = 1;

/// Highest level any qualifying threshold grants, or [`BASE_LEVEL`].
///
/// Scans every threshold instead of stopping at the first match so the
/// result does not depend on table order.
pub fn level_for_score(score: u64) -> u32 {
    LEVEL_THRESHOLDS
        .iter()
        .filter(|(threshold, _)| score >= *threshold)
        .map(|(_, level)| *level)
        .max()
        .unwrap_or(BASE_LEVEL)
}

/// Score still needed for the next level, `None` at the top level
pub fn score_to_next_level(score: u64) -> Option<u64> {
    LEVEL_THRESHOLDS
        .iter()
        .map(|(threshold, _)| *threshold)
        .filter(|threshold| *threshold > score)
        .min()
        .map(|threshold| threshold - score)
}
