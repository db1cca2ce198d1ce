use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::PlayerResult;
use crate::ledger::{GameId, PlayerId, ResultValue};

/// Overwrite the player's entry for `game_id`, or append one.
///
/// An overwritten entry keeps its row id and therefore its place in the
/// player's result order.
pub fn upsert_result(
    conn: &Connection,
    player_id: PlayerId,
    game_id: GameId,
    result: ResultValue,
) -> Result<()> {
    let sql = "INSERT INTO player_results (player_id, game_id, result) VALUES (?1, ?2, ?3) ON CONFLICT (player_id, game_id) DO UPDATE SET result = excluded.result";

    conn.execute(sql, params![player_id, game_id, result])
        .context("Failed to upsert player result")
        .map(|_| ())
}

/// Returns the number of entries removed.
pub fn remove_result(conn: &Connection, player_id: PlayerId, game_id: GameId) -> Result<usize> {
    conn.execute(
        "DELETE FROM player_results WHERE player_id = ?1 AND game_id = ?2",
        params![player_id, game_id],
    )
    .context("Failed to remove player result")
}

/// Result values in stored (insertion) order.
pub fn list_values(conn: &Connection, player_id: PlayerId) -> Result<Vec<ResultValue>> {
    let mut stmt =
        conn.prepare("SELECT result FROM player_results WHERE player_id = ?1 ORDER BY id")?;
    let rows = stmt
        .query_map(params![player_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_result_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerResult> {
    Ok(PlayerResult {
        id: row.get(0)?,
        player_id: row.get(1)?,
        game_id: row.get(2)?,
        result: row.get(3)?,
        game_name: row.get(4)?,
        game_date: row.get(5)?,
    })
}

/// Entries joined with their games, in stored order.
pub fn list_for_player(conn: &Connection, player_id: PlayerId) -> Result<Vec<PlayerResult>> {
    let sql = "
        SELECT r.id, r.player_id, r.game_id, r.result, g.name, g.date
        FROM player_results r
        JOIN games g ON g.id = r.game_id
        WHERE r.player_id = ?1
        ORDER BY r.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_result_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Players holding an entry for `game_id`.
pub fn players_for_game(conn: &Connection, game_id: GameId) -> Result<Vec<PlayerId>> {
    let mut stmt =
        conn.prepare("SELECT player_id FROM player_results WHERE game_id = ?1 ORDER BY id")?;
    let rows = stmt
        .query_map(params![game_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
