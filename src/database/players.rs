use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{NewPlayer, Player};
use crate::ledger::{LedgerStats, PlayerId};

const PLAYER_COLUMNS: &str = "id, name, handle, balance, game_count, max_series_of_win, max_series_of_loose, is_regular, is_show_in_rating";

pub fn insert_player(conn: &Connection, player: &NewPlayer) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (name, handle, is_regular, is_show_in_rating) VALUES (?1, ?2, ?3, ?4) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![player.name, player.handle, player.is_regular, player.is_show_in_rating],
        parse_player_row,
    )
    .context("Failed to insert new player")
}

pub fn update_profile(conn: &Connection, id: PlayerId, player: &NewPlayer) -> Result<Option<Player>> {
    let sql = format!(
        "UPDATE players SET name = ?1, handle = ?2, is_regular = ?3, is_show_in_rating = ?4 WHERE id = ?5 RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![player.name, player.handle, player.is_regular, player.is_show_in_rating, id],
        parse_player_row,
    )
    .optional()
    .context("Failed to update player")
}

pub fn update_stats(conn: &Connection, id: PlayerId, stats: &LedgerStats) -> Result<()> {
    let sql = "UPDATE players SET balance = ?1, game_count = ?2, max_series_of_win = ?3, max_series_of_loose = ?4 WHERE id = ?5";

    let updated = conn
        .execute(
            sql,
            params![
                stats.balance,
                stats.game_count,
                stats.max_series_of_win,
                stats.max_series_of_loose,
                id
            ],
        )
        .context("Failed to update player statistics")?;

    anyhow::ensure!(updated == 1, "player {id} not found");
    Ok(())
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        handle: row.get(2)?,
        balance: row.get(3)?,
        game_count: row.get(4)?,
        max_series_of_win: row.get(5)?,
        max_series_of_loose: row.get(6)?,
        is_regular: row.get(7)?,
        is_show_in_rating: row.get(8)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn find_by_handle(conn: &Connection, handle: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE handle = ?1");

    conn.query_row(&sql, params![handle], parse_player_row)
        .optional()
        .context("Failed to query player by handle")
}

/// Players in the order of `ids`; ids without a player are skipped.
pub fn find_many(conn: &Connection, ids: &[PlayerId]) -> Result<Vec<Player>> {
    let mut players = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(player) = find_by_id(conn, *id)? {
            players.push(player);
        }
    }
    Ok(players)
}

pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup::ensure_schema;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn draft<'a>(name: &'a str, handle: &'a str) -> NewPlayer<'a> {
        NewPlayer {
            name,
            handle,
            is_regular: false,
            is_show_in_rating: true,
        }
    }

    #[test]
    fn test_insert_and_find() {
        let conn = setup();
        let player = insert_player(&conn, &draft("Anna", "anna")).unwrap();

        assert_eq!(player.balance, 0);
        assert!(player.is_show_in_rating);
        assert_eq!(find_by_handle(&conn, "anna").unwrap(), Some(player.clone()));
        assert_eq!(find_by_handle(&conn, "Anna").unwrap(), None);
        assert_eq!(find_by_id(&conn, player.id).unwrap(), Some(player));
    }

    #[test]
    fn test_update_stats_requires_existing_player() {
        let conn = setup();
        let stats = LedgerStats {
            balance: 10,
            game_count: 1,
            max_series_of_win: 1,
            max_series_of_loose: 0,
        };
        assert!(update_stats(&conn, 99, &stats).is_err());

        let player = insert_player(&conn, &draft("Bob", "bob")).unwrap();
        update_stats(&conn, player.id, &stats).unwrap();
        assert_eq!(find_by_id(&conn, player.id).unwrap().unwrap().stats(), stats);
    }

    #[test]
    fn test_find_many_keeps_order() {
        let conn = setup();
        let a = insert_player(&conn, &draft("A", "a")).unwrap();
        let b = insert_player(&conn, &draft("B", "b")).unwrap();

        let players = find_many(&conn, &[b.id, 404, a.id]).unwrap();
        let ids: Vec<_> = players.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }
}
