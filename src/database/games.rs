use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Game, GameFields};
use crate::ledger::{GameId, PlayerId, ResultValue};

/// Row of the `games` table before its roster is attached.
struct GameRow {
    id: GameId,
    name: String,
    date: NaiveDateTime,
    buy_in: i64,
    is_big_game: bool,
}

pub fn insert_game(conn: &Connection, fields: &GameFields, players: &[PlayerId]) -> Result<Game> {
    let sql = "INSERT INTO games (name, date, buy_in, is_big_game) VALUES (?1, ?2, ?3, ?4) RETURNING id";

    let id: GameId = conn
        .query_row(
            sql,
            params![fields.name, fields.date, fields.buy_in, fields.is_big_game],
            |row| row.get(0),
        )
        .context("Failed to insert game")?;

    replace_roster(conn, id, players, &[])?;
    load_game(conn, id)
}

pub fn update_fields(conn: &Connection, id: GameId, fields: &GameFields) -> Result<()> {
    let sql = "UPDATE games SET name = ?1, date = ?2, buy_in = ?3, is_big_game = ?4 WHERE id = ?5";

    let updated = conn
        .execute(
            sql,
            params![fields.name, fields.date, fields.buy_in, fields.is_big_game, id],
        )
        .context("Failed to update game")?;

    anyhow::ensure!(updated == 1, "game {id} not found");
    Ok(())
}

/// Replace the ordered roster of a game. `results` is either empty or parallel
/// to `players`.
pub fn replace_roster(
    conn: &Connection,
    id: GameId,
    players: &[PlayerId],
    results: &[ResultValue],
) -> Result<()> {
    anyhow::ensure!(
        results.is_empty() || results.len() == players.len(),
        "game {id}: {} results for {} players",
        results.len(),
        players.len()
    );

    conn.execute("DELETE FROM game_players WHERE game_id = ?1", params![id])
        .context("Failed to clear game roster")?;

    let mut stmt = conn.prepare(
        "INSERT INTO game_players (game_id, position, player_id, result) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (position, player_id) in players.iter().enumerate() {
        let result = results.get(position).copied();
        stmt.execute(params![id, position as i64, player_id, result])
            .context("Failed to insert game roster entry")?;
    }

    Ok(())
}

fn parse_game_row(row: &rusqlite::Row) -> rusqlite::Result<GameRow> {
    Ok(GameRow {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        buy_in: row.get(3)?,
        is_big_game: row.get(4)?,
    })
}

fn attach_roster(conn: &Connection, row: GameRow) -> Result<Game> {
    let mut stmt = conn.prepare(
        "SELECT player_id, result FROM game_players WHERE game_id = ?1 ORDER BY position",
    )?;
    let roster = stmt
        .query_map(params![row.id], |r| {
            Ok((r.get::<_, PlayerId>(0)?, r.get::<_, Option<ResultValue>>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let players = roster.iter().map(|(player, _)| *player).collect();
    let results = roster
        .iter()
        .map(|(_, result)| *result)
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    Ok(Game {
        id: row.id,
        name: row.name,
        date: row.date,
        buy_in: row.buy_in,
        is_big_game: row.is_big_game,
        players,
        results,
    })
}

fn load_game(conn: &Connection, id: GameId) -> Result<Game> {
    find_by_id(conn, id)?.with_context(|| format!("game {id} vanished after write"))
}

pub fn find_by_id(conn: &Connection, id: GameId) -> Result<Option<Game>> {
    let sql = "SELECT id, name, date, buy_in, is_big_game FROM games WHERE id = ?1";

    let row = conn
        .query_row(sql, params![id], parse_game_row)
        .optional()
        .context("Failed to query game by id")?;

    row.map(|row| attach_roster(conn, row)).transpose()
}

/// Lookup by name; names compare case-insensitively.
pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Game>> {
    let sql = "SELECT id, name, date, buy_in, is_big_game FROM games WHERE name = ?1 COLLATE NOCASE";

    let row = conn
        .query_row(sql, params![name], parse_game_row)
        .optional()
        .context("Failed to query game by name")?;

    row.map(|row| attach_roster(conn, row)).transpose()
}

pub fn count(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
        .context("Failed to count games")
}

/// Newest games first.
pub fn list_page(conn: &Connection, limit: usize, offset: usize) -> Result<Vec<Game>> {
    let sql = "SELECT id, name, date, buy_in, is_big_game FROM games ORDER BY date DESC, id DESC LIMIT ?1 OFFSET ?2";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![limit as i64, offset as i64], parse_game_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(|row| attach_roster(conn, row)).collect()
}

pub fn delete_game(conn: &Connection, id: GameId) -> Result<()> {
    conn.execute("DELETE FROM game_players WHERE game_id = ?1", params![id])
        .context("Failed to delete game roster")?;
    let deleted = conn
        .execute("DELETE FROM games WHERE id = ?1", params![id])
        .context("Failed to delete game")?;

    anyhow::ensure!(deleted == 1, "game {id} not found");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup::ensure_schema;
    use chrono::NaiveDate;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn fields(name: &str, day: u32) -> GameFields<'_> {
        GameFields {
            name,
            date: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            buy_in: 500,
            is_big_game: false,
        }
    }

    #[test]
    fn test_insert_keeps_roster_order() {
        let conn = setup();
        let game = insert_game(&conn, &fields("01-03-2024", 1), &[3, 1, 2]).unwrap();

        assert_eq!(game.players, vec![3, 1, 2]);
        assert!(game.results.is_empty());
        assert_eq!(game.buy_in, 500);
    }

    #[test]
    fn test_replace_roster_with_results() {
        let conn = setup();
        let game = insert_game(&conn, &fields("01-03-2024", 1), &[1, 2]).unwrap();

        replace_roster(&conn, game.id, &[2, 1, 3], &[50, -20, -30]).unwrap();
        let game = find_by_id(&conn, game.id).unwrap().unwrap();
        assert_eq!(game.players, vec![2, 1, 3]);
        assert_eq!(game.results, vec![50, -20, -30]);

        assert!(replace_roster(&conn, game.id, &[1, 2], &[10]).is_err());
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let conn = setup();
        insert_game(&conn, &fields("Final Night", 1), &[]).unwrap();

        assert!(find_by_name(&conn, "final night").unwrap().is_some());
        assert!(find_by_name(&conn, "other").unwrap().is_none());
    }

    #[test]
    fn test_list_page_newest_first() {
        let conn = setup();
        for day in 1..=5 {
            let name = format!("0{day}-03-2024");
            insert_game(&conn, &fields(&name, day), &[]).unwrap();
        }

        let page = list_page(&conn, 2, 0).unwrap();
        let names: Vec<_> = page.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["05-03-2024", "04-03-2024"]);

        let last = list_page(&conn, 2, 4).unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].name, "01-03-2024");
        assert_eq!(count(&conn).unwrap(), 5);
    }

    #[test]
    fn test_delete_game() {
        let conn = setup();
        let game = insert_game(&conn, &fields("01-03-2024", 1), &[1]).unwrap();

        delete_game(&conn, game.id).unwrap();
        assert!(find_by_id(&conn, game.id).unwrap().is_none());
        assert!(delete_game(&conn, game.id).is_err());
    }
}
