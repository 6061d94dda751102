//! Scoring and leveling rules
//!
//! The free functions are the rules themselves. [`Score`] is the per-run
//! accumulator the game loop feeds them into.

/// Points for clearing 0..=4 lines at once
pub const LINE_POINTS: [u64; 5] = [0, 100, 300, 500, 800];

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

const GRAVITY_START_MS: u64 = 800;
const GRAVITY_STEP_MS: u64 = 85;
const GRAVITY_MIN_MS: u64 = 120;

/// Points for a simultaneous clear of `lines` rows; 0 outside 1..=4
pub fn score_for_lines(lines: usize) -> u64 {
    LINE_POINTS.get(lines).copied().unwrap_or(0)
}

/// Soft drop awards 1 point per cell
pub fn score_soft_drop(cells: u32) -> u64 {
    cells as u64
}

/// Hard drop awards 2 points per cell
pub fn score_hard_drop(cells: u32) -> u64 {
    cells as u64 * 2
}

/// Result of [`update_level`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpdate {
    pub level: u32,
    pub total_lines: u32,
}

/// Add newly cleared lines and recompute the level from the new total.
///
/// The level is recomputed rather than incremented, so it can jump by more
/// than one. The previous level is accepted for symmetry with callers that
/// track it but does not affect the result.
pub fn update_level(_level: u32, total_lines: u32, cleared: u32) -> LevelUpdate {
    let total_lines = total_lines + cleared;
    LevelUpdate {
        level: total_lines / LINES_PER_LEVEL,
        total_lines,
    }
}

/// Gravity interval for a level: 800ms minus 85ms per level, floored at 120ms
pub fn gravity_interval_ms(level: u32) -> u64 {
    GRAVITY_START_MS
        .saturating_sub(GRAVITY_STEP_MS.saturating_mul(level as u64))
        .max(GRAVITY_MIN_MS)
}

/// Score, level and line tracking for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level (starts at 0)
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a line clear; returns the points gained
    pub fn add_clear(&mut self, cleared: usize) -> u64 {
        let gained = score_for_lines(cleared);
        let update = update_level(self.level, self.lines, cleared as u32);
        self.level = update.level;
        self.lines = update.total_lines;
        self.points += gained;
        gained
    }

    /// Add score for soft drop; returns the points gained
    pub fn add_soft_drop(&mut self, cells: u32) -> u64 {
        let gained = score_soft_drop(cells);
        self.points += gained;
        gained
    }

    /// Add score for hard drop; returns the points gained
    pub fn add_hard_drop(&mut self, cells: u32) -> u64 {
        let gained = score_hard_drop(cells);
        self.points += gained;
        gained
    }

    /// Gravity interval for the current level
    pub fn gravity_interval_ms(&self) -> u64 {
        gravity_interval_ms(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_table() {
        assert_eq!(score_for_lines(1), 100);
        assert_eq!(score_for_lines(2), 300);
        assert_eq!(score_for_lines(3), 500);
        assert_eq!(score_for_lines(4), 800);
        assert_eq!(score_for_lines(0), 0);
        assert_eq!(score_for_lines(5), 0);
        assert_eq!(score_for_lines(usize::MAX), 0);
    }

    #[test]
    fn test_drop_rewards() {
        assert_eq!(score_soft_drop(3), 3);
        assert_eq!(score_hard_drop(17), 34);
        assert_eq!(score_hard_drop(0), 0);
    }

    #[test]
    fn test_update_level_crosses_boundary() {
        assert_eq!(
            update_level(0, 7, 4),
            LevelUpdate {
                level: 1,
                total_lines: 11
            }
        );
    }

    #[test]
    fn test_update_level_can_jump() {
        let update = update_level(0, 18, 4);
        assert_eq!(update.level, 2);
        assert_eq!(update.total_lines, 22);
    }

    #[test]
    fn test_gravity_interval() {
        assert_eq!(gravity_interval_ms(0), 800);
        assert_eq!(gravity_interval_ms(5), 375);
        assert_eq!(gravity_interval_ms(8), 120);
        assert_eq!(gravity_interval_ms(20), 120);
        assert_eq!(gravity_interval_ms(u32::MAX), 120);
    }

    #[test]
    fn test_gravity_is_monotonic() {
        for level in 0..30 {
            assert!(gravity_interval_ms(level + 1) <= gravity_interval_ms(level));
        }
    }

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        assert_eq!(score.add_clear(1), 100);
        assert_eq!(score.points, 100);
        assert_eq!(score.lines, 1);
        assert_eq!(score.level, 0);
    }

    #[test]
    fn test_level_up() {
        let mut score = Score::new();
        for _ in 0..10 {
            score.add_clear(1);
        }
        assert_eq!(score.level, 1);
        assert_eq!(score.gravity_interval_ms(), 715);
    }
}
