pub type PlayerId = i64;
pub type GameId = i64;
pub type ResultValue = i64;

/// Statistics derived from a player's ordered result list.
///
/// This is cached state: it can always be rebuilt from the stored results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub balance: i64,
    pub game_count: i64,
    pub max_series_of_win: i64,
    pub max_series_of_loose: i64,
}

/// Which sign of result a streak counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakKind {
    Win,
    Loss,
}

impl StreakKind {
    pub fn extends(self, result: ResultValue) -> bool {
        match self {
            StreakKind::Win => result > 0,
            StreakKind::Loss => result < 0,
        }
    }

    pub fn breaks(self, result: ResultValue) -> bool {
        match self {
            StreakKind::Win => result < 0,
            StreakKind::Loss => result > 0,
        }
    }
}
