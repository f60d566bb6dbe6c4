//! User Repository

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::{User, UserCreate, UserUpdate};
use crate::utils::time::now_millis;
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN};

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find all users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> =
            sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Create a new user
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        validate_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_text(&data.username, "username", MAX_SHORT_TEXT_LEN)?;
        validate_text(&data.password, "password", MAX_PASSWORD_LEN)?;

        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let now = now_millis();
        let result = sqlx::query(
            "INSERT INTO users (name, username, password, role, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.username)
        .bind(&data.password)
        .bind(data.role)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate(
                format!("Username '{}' already exists", data.username),
            ),
            _ => RepoError::from(e),
        })?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user
    pub async fn update(&self, id: i64, data: UserUpdate) -> RepoResult<User> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))?;

        if let Some(name) = &data.name {
            validate_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(password) = &data.password {
            validate_text(password, "password", MAX_PASSWORD_LEN)?;
        }

        // Check duplicate username if changing
        if let Some(new_username) = &data.username {
            validate_text(new_username, "username", MAX_SHORT_TEXT_LEN)?;
            if *new_username != existing.username
                && self.find_by_username(new_username).await?.is_some()
            {
                return Err(RepoError::Duplicate(format!(
                    "Username '{new_username}' already exists"
                )));
            }
        }

        sqlx::query(
            "UPDATE users SET \
             name = COALESCE(?, name), \
             username = COALESCE(?, username), \
             password = COALESCE(?, password), \
             role = COALESCE(?, role), \
             updated_at = ? \
             WHERE id = ?",
        )
        .bind(&data.name)
        .bind(&data.username)
        .bind(&data.password)
        .bind(data.role)
        .bind(now_millis())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
    }

    /// Hard delete a user. The caller is responsible for the
    /// cannot-delete-own-account rule (it needs the acting user).
    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }
}

fn validate_text(value: &str, field: &str, max_len: usize) -> RepoResult<()> {
    if value.trim().is_empty() {
        return Err(RepoError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(RepoError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::UserRole;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn create_and_duplicate_username() {
        let repo = UserRepository::new(test_pool().await);

        let user = repo
            .create(UserCreate {
                name: "Gudang Satu".to_string(),
                username: "gudang1".to_string(),
                password: "rahasia".to_string(),
                role: UserRole::Warehouse,
            })
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Warehouse);

        let err = repo
            .create(UserCreate {
                name: "Gudang Dua".to_string(),
                username: "gudang1".to_string(),
                password: "rahasia".to_string(),
                role: UserRole::Warehouse,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_checks_username_excluding_self() {
        let repo = UserRepository::new(test_pool().await);

        let user = repo
            .create(UserCreate {
                name: "Packing Satu".to_string(),
                username: "packing1".to_string(),
                password: "rahasia".to_string(),
                role: UserRole::Packing,
            })
            .await
            .unwrap();

        // Re-submitting the own username is not a conflict
        let updated = repo
            .update(
                user.id,
                UserUpdate {
                    name: Some("Packing Utama".to_string()),
                    username: Some("packing1".to_string()),
                    password: None,
                    role: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Packing Utama");

        // Taking the seeded admin's username is
        let err = repo
            .update(
                user.id,
                UserUpdate {
                    name: None,
                    username: Some("admin".to_string()),
                    password: None,
                    role: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let repo = UserRepository::new(test_pool().await);
        assert!(matches!(
            repo.delete(9999).await,
            Err(RepoError::NotFound(_))
        ));
    }
}
