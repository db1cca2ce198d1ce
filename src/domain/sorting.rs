use std::cmp::Ordering;

use crate::database::Player;

/// Derived fields the player list may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSort {
    Balance,
    GameCount,
    MaxSeriesOfWin,
    MaxSeriesOfLoose,
}

impl PlayerSort {
    fn key(self, player: &Player) -> i64 {
        match self {
            PlayerSort::Balance => player.balance,
            PlayerSort::GameCount => player.game_count,
            PlayerSort::MaxSeriesOfWin => player.max_series_of_win,
            PlayerSort::MaxSeriesOfLoose => player.max_series_of_loose,
        }
    }
}

/// Chosen field descending, then regulars first, then name ascending.
pub fn compare_players(sort: Option<PlayerSort>, a: &Player, b: &Player) -> Ordering {
    let by_field = sort
        .map(|s| s.key(b).cmp(&s.key(a)))
        .unwrap_or(Ordering::Equal);

    by_field
        .then_with(|| b.is_regular.cmp(&a.is_regular))
        .then_with(|| a.name.cmp(&b.name))
}

pub fn sort_players(players: &mut [Player], sort: Option<PlayerSort>) {
    players.sort_by(|a, b| compare_players(sort, a, b));
}
