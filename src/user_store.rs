use sqlx::SqlitePool;

use crate::{
    error::{AppError, Result, ValidationError},
    model::{User, UserId},
    password::{hash_password, verify_password},
};

/// Extended result code SQLite reports for a violated UNIQUE constraint.
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

#[derive(Debug, Clone)]
pub struct UserStore {
    db: SqlitePool,
}

impl UserStore {
    pub fn new(db: SqlitePool) -> Self {
        UserStore { db }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserId> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingField("username").into());
        }
        if email.is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }

        let hashed_password = hash_password(password)?;

        let mut tx = self.db.begin().await?;
        let user_id = sqlx::query_scalar::<_, UserId>(
            "INSERT INTO users (username, email, password) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(username)
        .bind(email)
        .bind(&hashed_password)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateUsername
            } else {
                AppError::Database(e)
            }
        })?;
        tx.commit().await?;

        Ok(user_id)
    }

    /// Returns the user only when the password matches. Unknown users and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password FROM users WHERE username = ?",
        )
        .bind(username.trim())
        .fetch_optional(&self.db)
        .await?;

        Ok(user.filter(|user| verify_password(password, &user.password)))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_UNIQUE)
                || db_err.message().starts_with("UNIQUE constraint failed")
        }
        _ => false,
    }
}
