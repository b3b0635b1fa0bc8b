//! Helpers for integration tests.

#![allow(dead_code)]

use chrono::Utc;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_blog::db::{DbPool, establish_connection_pool};
use pushkind_blog::domain::category::{Category, NewCategory};
use pushkind_blog::domain::types::{CategoryName, EmailAddress, PasswordHash, Username};
use pushkind_blog::domain::user::{NewUser, User};
use pushkind_blog::repository::{CategoryWriter, DieselRepository, UserWriter};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repository(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn create_user(repo: &DieselRepository, username: &str, email: &str, admin: bool) -> User {
    create_user_with_hash(repo, username, email, "not-a-real-hash", admin)
}

pub fn create_user_with_hash(
    repo: &DieselRepository,
    username: &str,
    email: &str,
    password_hash: &str,
    admin: bool,
) -> User {
    let now = Utc::now().naive_utc();
    repo.create_user(&NewUser {
        username: Username::new(username).expect("valid username"),
        email: EmailAddress::new(email).expect("valid email"),
        password_hash: PasswordHash::new(password_hash).expect("valid hash"),
        admin,
        created_at: now,
        updated_at: now,
    })
    .expect("should create user")
}

pub fn create_category(repo: &DieselRepository, name: &str) -> Category {
    let now = Utc::now().naive_utc();
    repo.create_category(&NewCategory {
        name: CategoryName::new(name).expect("valid category name"),
        created_at: now,
        updated_at: now,
    })
    .expect("should create category")
}
