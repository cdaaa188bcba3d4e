use rusqlite::{Connection, params};
use serde::Serialize;

/// Internal user struct for authentication — includes password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Safe version for API responses — no password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserDisplay {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        password: row.get("password")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn row_to_user_display(row: &rusqlite::Row) -> rusqlite::Result<UserDisplay> {
    Ok(UserDisplay {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Find a user by email for authentication. Returns internal User with
/// password hash.
pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, password, created_at, updated_at \
         FROM users WHERE email = ?1",
    )?;
    let mut rows = stmt.query_map(params![email], row_to_user)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn find_display_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<UserDisplay>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, created_at, updated_at FROM users WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id], row_to_user_display)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// True if the email is already registered to a different user.
pub fn email_taken(conn: &Connection, email: &str, exclude_id: Option<i64>) -> rusqlite::Result<bool> {
    match exclude_id {
        Some(id) => conn.query_row(
            "SELECT COUNT(*) > 0 FROM users WHERE email = ?1 AND id != ?2",
            params![email, id],
            |row| row.get(0),
        ),
        None => conn.query_row(
            "SELECT COUNT(*) > 0 FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        ),
    }
}

pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Already hashed.
    pub password: String,
}

pub fn create(conn: &Connection, new: &NewUser) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)",
        params![new.name, new.email, new.password],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update name and email; password changes go through `update_password`.
pub fn update_profile(conn: &Connection, id: i64, name: &str, email: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE users SET name = ?1, email = ?2, \
         updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') WHERE id = ?3",
        params![name, email, id],
    )?;
    Ok(())
}

pub fn update_password(conn: &Connection, id: i64, password_hash: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE users SET password = ?1, \
         updated_at = strftime('%Y-%m-%dT%H:%M:%S','now') WHERE id = ?2",
        params![password_hash, id],
    )?;
    Ok(())
}

pub fn find_password_hash_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT password FROM users WHERE id = ?1")?;
    let mut rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
    match rows.next() {
        Some(val) => Ok(Some(val?)),
        None => Ok(None),
    }
}
