//! Shared test infrastructure for model layer tests.
//!
//! `setup_test_db()` creates a temporary SQLite database with the schema
//! applied, the standard setup for all model-layer tests.

use rusqlite::Connection;
use tempfile::TempDir;

use presently::auth::password;
use presently::db::MIGRATIONS;
use presently::models::user::{self, NewUser};

pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "password123";
pub const TEST_NAME: &str = "Test User";

/// Setup a test database with schema applied.
///
/// Returns a tuple of (TempDir, Connection) where TempDir must be kept
/// alive for the Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");

    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// Create a user with the standard test credentials and return its id.
#[allow(dead_code)]
pub fn create_test_user(conn: &Connection, email: &str) -> i64 {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let new_user = NewUser {
        name: TEST_NAME.to_string(),
        email: email.to_string(),
        password: hash,
    };
    user::create(conn, &new_user).expect("Failed to create user")
}
