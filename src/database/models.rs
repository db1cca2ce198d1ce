use chrono::NaiveDateTime;

use crate::ledger::{GameId, LedgerStats, PlayerId, ResultValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub handle: String,
    pub balance: i64,
    pub game_count: i64,
    pub max_series_of_win: i64,
    pub max_series_of_loose: i64,
    pub is_regular: bool,
    pub is_show_in_rating: bool,
}

impl Player {
    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            balance: self.balance,
            game_count: self.game_count,
            max_series_of_win: self.max_series_of_win,
            max_series_of_loose: self.max_series_of_loose,
        }
    }
}

/// One entry of a player's result list, joined with the game it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerResult {
    pub id: i64,
    pub player_id: PlayerId,
    pub game_id: GameId,
    pub result: ResultValue,
    pub game_name: String,
    pub game_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub date: NaiveDateTime,
    pub buy_in: i64,
    pub is_big_game: bool,
    pub players: Vec<PlayerId>,
    /// Parallel to `players`; empty until results have been saved.
    pub results: Vec<ResultValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

// Write-side DTOs

#[derive(Debug, Clone)]
pub struct NewPlayer<'a> {
    pub name: &'a str,
    pub handle: &'a str,
    pub is_regular: bool,
    pub is_show_in_rating: bool,
}

#[derive(Debug, Clone)]
pub struct GameFields<'a> {
    pub name: &'a str,
    pub date: NaiveDateTime,
    pub buy_in: i64,
    pub is_big_game: bool,
}
