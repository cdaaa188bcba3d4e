use rusqlite::{Connection, params};
use serde::Serialize;

/// Metadata row for a generated deck file. Inserted once the file exists on
/// disk; never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub filename: String,
    pub created_at: String,
}

fn row_to_presentation(row: &rusqlite::Row) -> rusqlite::Result<Presentation> {
    Ok(Presentation {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        filename: row.get("filename")?,
        created_at: row.get("created_at")?,
    })
}

pub fn create(conn: &Connection, user_id: i64, title: &str, filename: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO presentations (user_id, title, filename) VALUES (?1, ?2, ?3)",
        params![user_id, title, filename],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All records owned by one user, newest first.
pub fn find_by_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Presentation>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, title, filename, created_at \
         FROM presentations WHERE user_id = ?1 \
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt
        .query_map(params![user_id], row_to_presentation)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Presentation>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, title, filename, created_at FROM presentations WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id], row_to_presentation)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}
