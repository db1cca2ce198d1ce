use std::fmt;

use anyhow::Context;
use colored::Colorize;
use log::info;
use rusqlite::TransactionBehavior;

use crate::database::{self, DbPool, NewPlayer, Player, PlayerResult};
use crate::domain::{running_balance, sort_newest_first, sort_players, HistoryPoint, PlayerSort};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{self, LedgerStats, PlayerId};

/// Input of `save_player`. Without an id a new player is created.
#[derive(Debug, Clone, Default)]
pub struct PlayerDraft {
    pub id: Option<PlayerId>,
    pub name: String,
    pub handle: String,
    pub is_regular: Option<bool>,
    pub is_show_in_rating: Option<bool>,
}

/// A player whose cached statistics disagreed with the stored results.
#[derive(Debug, Clone, PartialEq)]
pub struct StalePlayer {
    pub handle: String,
    pub cached: LedgerStats,
    pub derived: LedgerStats,
}

impl fmt::Display for StalePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} balance {} -> {}, games {} -> {}, win streak {} -> {}, loss streak {} -> {}",
            self.handle.bold(),
            self.cached.balance.to_string().red(),
            self.derived.balance.to_string().green(),
            self.cached.game_count,
            self.derived.game_count,
            self.cached.max_series_of_win,
            self.derived.max_series_of_win,
            self.cached.max_series_of_loose,
            self.derived.max_series_of_loose,
        )
    }
}

pub struct PlayerDirectory {
    pool: DbPool,
}

impl PlayerDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn save_player(&self, draft: PlayerDraft) -> LedgerResult<Player> {
        let name = draft.name.trim();
        let handle = draft.handle.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("player name is required"));
        }
        if handle.is_empty() {
            return Err(LedgerError::validation("player handle is required"));
        }

        let conn = database::get_connection(&self.pool)?;
        let holder = database::players::find_by_handle(&conn, handle)?;

        match draft.id {
            None => {
                if holder.is_some() {
                    return Err(handle_taken(handle));
                }
                let player = database::players::insert_player(
                    &conn,
                    &NewPlayer {
                        name,
                        handle,
                        is_regular: draft.is_regular.unwrap_or(false),
                        is_show_in_rating: draft.is_show_in_rating.unwrap_or(true),
                    },
                )?;
                info!("Created player {} ({})", player.handle, player.id);
                Ok(player)
            }
            Some(id) => {
                let existing = database::players::find_by_id(&conn, id)?
                    .ok_or_else(|| LedgerError::not_found("player", id))?;
                if holder.is_some_and(|p| p.id != id) {
                    return Err(handle_taken(handle));
                }
                let player = database::players::update_profile(
                    &conn,
                    id,
                    &NewPlayer {
                        name,
                        handle,
                        is_regular: draft.is_regular.unwrap_or(existing.is_regular),
                        is_show_in_rating: draft
                            .is_show_in_rating
                            .unwrap_or(existing.is_show_in_rating),
                    },
                )?
                .ok_or_else(|| LedgerError::not_found("player", id))?;
                info!("Updated player {} ({})", player.handle, player.id);
                Ok(player)
            }
        }
    }

    pub fn find_by_id(&self, id: PlayerId) -> LedgerResult<Player> {
        let conn = database::get_connection(&self.pool)?;
        database::players::find_by_id(&conn, id)?
            .ok_or_else(|| LedgerError::not_found("player", id))
    }

    /// The player and their entries, newest game first.
    pub fn find_by_handle(&self, handle: &str) -> LedgerResult<(Player, Vec<PlayerResult>)> {
        let conn = database::get_connection(&self.pool)?;
        let player = database::players::find_by_handle(&conn, handle)?
            .ok_or_else(|| LedgerError::not_found("player", handle))?;
        let mut results = database::results::list_for_player(&conn, player.id)?;
        sort_newest_first(&mut results);
        Ok((player, results))
    }

    /// Entries in stored order.
    pub fn results_for(&self, id: PlayerId) -> LedgerResult<Vec<PlayerResult>> {
        let conn = database::get_connection(&self.pool)?;
        Ok(database::results::list_for_player(&conn, id)?)
    }

    /// Players in the order of `ids`, skipping unknown ids.
    pub fn find_many(&self, ids: &[PlayerId]) -> LedgerResult<Vec<Player>> {
        let conn = database::get_connection(&self.pool)?;
        Ok(database::players::find_many(&conn, ids)?)
    }

    pub fn list_sorted(&self, sort: Option<PlayerSort>) -> LedgerResult<Vec<Player>> {
        let conn = database::get_connection(&self.pool)?;
        let mut players = database::players::list_all(&conn)?;
        sort_players(&mut players, sort);
        Ok(players)
    }

    pub fn history(&self, handle: &str) -> LedgerResult<Vec<HistoryPoint>> {
        let conn = database::get_connection(&self.pool)?;
        let player = database::players::find_by_handle(&conn, handle)?
            .ok_or_else(|| LedgerError::not_found("player", handle))?;
        let results = database::results::list_for_player(&conn, player.id)?;
        Ok(running_balance(&player.name, &results))
    }

    /// Series of every handle, concatenated in the given order.
    pub fn histories(&self, handles: &[String]) -> LedgerResult<Vec<HistoryPoint>> {
        let mut points = Vec::new();
        for handle in handles {
            points.extend(self.history(handle)?);
        }
        Ok(points)
    }

    /// Re-derive every player's statistics from the stored results. Returns
    /// the players whose cached values were out of date.
    pub fn recompute_all(&self) -> LedgerResult<Vec<StalePlayer>> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to open transaction")?;

        let mut stale = Vec::new();
        for player in database::players::list_all(&tx)? {
            let values = database::results::list_values(&tx, player.id)?;
            let cached = player.stats();
            let derived = ledger::derive_stats(&values).ok_or_else(|| {
                LedgerError::validation(format!("balance of {} is out of range", player.handle))
            })?;
            if derived != cached {
                database::players::update_stats(&tx, player.id, &derived)?;
                stale.push(StalePlayer {
                    handle: player.handle,
                    cached,
                    derived,
                });
            }
        }

        tx.commit().context("Failed to commit recomputed statistics")?;
        info!("Recomputed player statistics, {} were stale", stale.len());
        Ok(stale)
    }
}

fn handle_taken(handle: &str) -> LedgerError {
    LedgerError::conflict(format!("handle {handle} is already taken"))
}
