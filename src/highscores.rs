//! High score leaderboard
//!
//! Built from the session history: the best archived sessions plus the one
//! in progress, ranked by score.

use serde::Serialize;

use crate::sim::{GameRecord, GameState, Key};

/// Maximum number of archived sessions shown
pub const MAX_HIGH_SCORES: usize = 8;

/// A single leaderboard line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    /// 1-indexed
    pub rank: usize,
    pub key: Key,
    pub score: u64,
    /// True for the session in progress
    pub current: bool,
}

/// Leaderboard over a state's history
#[derive(Debug, Clone, Default, Serialize)]
pub struct HighScores {
    pub rows: Vec<LeaderboardRow>,
}

impl HighScores {
    /// Rank the top archived sessions (zero scores dropped) together with the current one
    pub fn from_state(state: &GameState) -> Self {
        Self::rank(state.old_games(), state.current_game())
    }

    pub fn rank(old_games: &[GameRecord], current: &GameRecord) -> Self {
        let mut best: Vec<&GameRecord> = old_games.iter().collect();
        best.sort_by(|a, b| b.score.cmp(&a.score));
        best.truncate(MAX_HIGH_SCORES);
        best.retain(|g| g.score > 0);

        let mut entries: Vec<(&GameRecord, bool)> = best.into_iter().map(|g| (g, false)).collect();
        entries.push((current, true));
        entries.sort_by(|a, b| b.0.score.cmp(&a.0.score));

        let rows = entries
            .into_iter()
            .enumerate()
            .map(|(i, (game, current))| LeaderboardRow {
                rank: i + 1,
                key: game.key,
                score: game.score,
                current,
            })
            .collect();
        Self { rows }
    }

    /// Rank of the session in progress
    pub fn current_rank(&self) -> Option<usize> {
        self.rows.iter().find(|r| r.current).map(|r| r.rank)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.rows.first().map(|r| r.score)
    }

    /// Best archived score, ignoring the session in progress
    pub fn best_archived(&self) -> Option<u64> {
        self.rows.iter().find(|r| !r.current).map(|r| r.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: u64, score: u64) -> GameRecord {
        GameRecord {
            key: Key(key),
            score,
            started_at: 0.0,
        }
    }

    #[test]
    fn test_current_always_listed() {
        let board = HighScores::rank(&[], &record(1, 0));
        assert_eq!(board.rows.len(), 1);
        assert_eq!(board.current_rank(), Some(1));
        assert_eq!(board.best_archived(), None);
    }

    #[test]
    fn test_zero_scores_dropped_and_sorted() {
        let old = [record(1, 5), record(2, 0), record(3, 40), record(4, 12)];
        let board = HighScores::rank(&old, &record(9, 20));
        let scores: Vec<u64> = board.rows.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![40, 20, 12, 5]);
        assert_eq!(board.current_rank(), Some(2));
        assert_eq!(board.top_score(), Some(40));
        assert_eq!(board.best_archived(), Some(40));
        let ranks: Vec<usize> = board.rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_only_top_eight_archived() {
        let old: Vec<_> = (1..=20).map(|i| record(i, i * 10)).collect();
        let board = HighScores::rank(&old, &record(99, 1));
        assert_eq!(board.rows.len(), MAX_HIGH_SCORES + 1);
        assert_eq!(board.rows[0].score, 200);
        assert_eq!(board.rows[MAX_HIGH_SCORES - 1].score, 130);
        assert_eq!(board.current_rank(), Some(MAX_HIGH_SCORES + 1));
    }

    #[test]
    fn test_ties_keep_archive_ahead_of_current() {
        let board = HighScores::rank(&[record(1, 10)], &record(2, 10));
        assert!(!board.rows[0].current);
        assert!(board.rows[1].current);
    }

    #[test]
    fn test_from_state_uses_history() {
        let mut state = GameState::new(1);
        crate::sim::reset(&mut state, 0.0);
        state.current_game.score = 30;
        crate::sim::reset(&mut state, 10.0);
        let board = HighScores::from_state(&state);
        assert_eq!(board.top_score(), Some(30));
        assert_eq!(board.current_rank(), Some(2));
    }
}
