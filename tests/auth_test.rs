//! Authentication tests — covers password hashing, verification, user
//! creation, and password updates.
//!
//! Tests the authentication layer at the model level:
//! - Password hashing with argon2
//! - Password verification (correct and incorrect)
//! - User creation and lookup by email
//! - Password updates and re-verification

mod common;

use presently::auth::password;
use presently::models::user::{self, NewUser};
use common::*;

#[test]
fn test_hash_password_success() {
    let hash = password::hash_password(TEST_PASSWORD)
        .expect("Failed to hash password");

    assert!(!hash.is_empty());
    assert!(hash.len() > 20); // Argon2 hashes are long
}

#[test]
fn test_verify_password_correct() {
    let hash = password::hash_password(TEST_PASSWORD)
        .expect("Failed to hash password");

    let verified = password::verify_password(TEST_PASSWORD, &hash)
        .expect("Verification failed");

    assert!(verified);
}

#[test]
fn test_verify_password_incorrect() {
    let hash = password::hash_password(TEST_PASSWORD)
        .expect("Failed to hash password");

    let verified = password::verify_password("wrongpassword", &hash)
        .expect("Verification failed");

    assert!(!verified);
}

#[test]
fn test_hash_password_randomness() {
    let hash1 = password::hash_password(TEST_PASSWORD)
        .expect("Failed to hash first password");
    let hash2 = password::hash_password(TEST_PASSWORD)
        .expect("Failed to hash second password");

    // Same password should produce different hashes (different salts)
    assert_ne!(hash1, hash2);

    // But both hashes should verify with the same password
    assert!(password::verify_password(TEST_PASSWORD, &hash1)
        .expect("Verification 1 failed"));
    assert!(password::verify_password(TEST_PASSWORD, &hash2)
        .expect("Verification 2 failed"));
}

#[test]
fn test_create_user_success() {
    let (_dir, conn) = setup_test_db();

    let user_id = create_test_user(&conn, TEST_EMAIL);
    assert!(user_id > 0);
}

#[test]
fn test_find_user_by_email() {
    let (_dir, conn) = setup_test_db();

    let created_id = create_test_user(&conn, TEST_EMAIL);

    let found = user::find_by_email(&conn, TEST_EMAIL)
        .expect("Query failed")
        .expect("User not found");

    assert_eq!(found.id, created_id);
    assert_eq!(found.name, TEST_NAME);
    assert_eq!(found.email, TEST_EMAIL);
    assert!(password::verify_password(TEST_PASSWORD, &found.password)
        .expect("Verification failed"));
}

#[test]
fn test_find_user_by_email_not_found() {
    let (_dir, conn) = setup_test_db();

    let result = user::find_by_email(&conn, "nobody@example.com")
        .expect("Query failed");

    assert!(result.is_none());
}

#[test]
fn test_duplicate_email_rejected() {
    let (_dir, conn) = setup_test_db();

    create_test_user(&conn, TEST_EMAIL);

    assert!(user::email_taken(&conn, TEST_EMAIL, None).expect("Query failed"));
    assert!(!user::email_taken(&conn, "other@example.com", None).expect("Query failed"));

    // The UNIQUE constraint backs the check at the storage level too
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let dup = NewUser {
        name: "Other".to_string(),
        email: TEST_EMAIL.to_string(),
        password: hash,
    };
    assert!(user::create(&conn, &dup).is_err());
}

#[test]
fn test_email_taken_excludes_self() {
    let (_dir, conn) = setup_test_db();

    let id = create_test_user(&conn, TEST_EMAIL);

    // A user keeping their own email is not a conflict
    assert!(!user::email_taken(&conn, TEST_EMAIL, Some(id)).expect("Query failed"));

    let other = create_test_user(&conn, "other@example.com");
    assert!(user::email_taken(&conn, TEST_EMAIL, Some(other)).expect("Query failed"));
}

#[test]
fn test_update_password_and_reverify() {
    let (_dir, conn) = setup_test_db();

    let id = create_test_user(&conn, TEST_EMAIL);

    let new_hash = password::hash_password("newsecret123")
        .expect("Failed to hash new password");
    user::update_password(&conn, id, &new_hash).expect("Failed to update password");

    let stored = user::find_password_hash_by_id(&conn, id)
        .expect("Query failed")
        .expect("No hash stored");

    assert!(password::verify_password("newsecret123", &stored)
        .expect("Verification failed"));
    assert!(!password::verify_password(TEST_PASSWORD, &stored)
        .expect("Verification failed"));
}

#[test]
fn test_update_profile() {
    let (_dir, conn) = setup_test_db();

    let id = create_test_user(&conn, TEST_EMAIL);

    user::update_profile(&conn, id, "Renamed User", "renamed@example.com")
        .expect("Failed to update profile");

    let display = user::find_display_by_id(&conn, id)
        .expect("Query failed")
        .expect("User not found");

    assert_eq!(display.name, "Renamed User");
    assert_eq!(display.email, "renamed@example.com");
}
