use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::User;

/// Insert a user. The admin flag is decided in the same statement: only a
/// user inserted into an empty table becomes admin.
pub fn insert_user(conn: &Connection, email: &str, password_hash: &str) -> Result<User> {
    let sql = "INSERT INTO users (email, password_hash, is_admin)
               SELECT ?1, ?2, NOT EXISTS (SELECT 1 FROM users)
               RETURNING id, email, password_hash, is_admin";

    conn.query_row(sql, params![email, password_hash], parse_user_row)
        .context("Failed to insert user")
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        is_admin: row.get(3)?,
    })
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let sql = "SELECT id, email, password_hash, is_admin FROM users WHERE email = ?1";

    conn.query_row(sql, params![email], parse_user_row)
        .optional()
        .context("Failed to query user by email")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    let sql = "SELECT id, email, password_hash, is_admin FROM users WHERE id = ?1";

    conn.query_row(sql, params![id], parse_user_row)
        .optional()
        .context("Failed to query user by id")
}

pub fn update_password(conn: &Connection, id: i64, password_hash: &str) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id],
        )
        .context("Failed to update user password")?;

    anyhow::ensure!(updated == 1, "user {id} not found");
    Ok(())
}
