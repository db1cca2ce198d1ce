use anyhow::{anyhow, Result};
use log::warn;
use rusqlite::Connection;

use crate::database;
use crate::errors::{LedgerError, LedgerResult, PlayerUpdateFailure};
use crate::ledger::{self, GameId, LedgerStats, PlayerId, ResultValue};

/// Re-derive a player's statistics from the stored result list and persist
/// them.
pub fn refresh_stats(conn: &Connection, player_id: PlayerId) -> Result<LedgerStats> {
    let values = database::results::list_values(conn, player_id)?;
    let stats = ledger::derive_stats(&values)
        .ok_or_else(|| anyhow!("balance of player {player_id} is out of range"))?;
    database::players::update_stats(conn, player_id, &stats)?;
    Ok(stats)
}

/// Record `result` as the player's outcome of `game_id` and refresh the
/// player's statistics.
pub fn record_result(
    conn: &Connection,
    player_id: PlayerId,
    game_id: GameId,
    result: ResultValue,
) -> Result<LedgerStats> {
    ensure_player(conn, player_id)?;
    database::results::upsert_result(conn, player_id, game_id, result)?;
    refresh_stats(conn, player_id)
}

/// Drop the player's entry for `game_id` and refresh the player's statistics.
pub fn withdraw_result(conn: &Connection, player_id: PlayerId, game_id: GameId) -> Result<LedgerStats> {
    ensure_player(conn, player_id)?;
    database::results::remove_result(conn, player_id, game_id)?;
    refresh_stats(conn, player_id)
}

fn ensure_player(conn: &Connection, player_id: PlayerId) -> Result<()> {
    database::players::find_by_id(conn, player_id)?
        .map(|_| ())
        .ok_or_else(|| anyhow!("player {player_id} not found"))
}

/// Collects per-player failures so every player is attempted before the
/// caller decides whether to commit.
#[derive(Debug, Default)]
pub struct PlayerUpdates {
    failures: Vec<PlayerUpdateFailure>,
}

impl PlayerUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track<T>(&mut self, player_id: PlayerId, outcome: Result<T>) {
        if let Err(e) = outcome {
            warn!("Failed to update player {player_id}: {e:#}");
            self.failures.push(PlayerUpdateFailure {
                player_id,
                reason: format!("{e:#}"),
            });
        }
    }

    pub fn finish(self) -> LedgerResult<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::PlayerUpdatesFailed(self.failures))
        }
    }
}
