use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::birthday::{Birthday, NewBirthday};
use crate::repository::BirthdayRepository;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BirthdayRepository for SqliteRepository {
    async fn create(&self, entry: &NewBirthday) -> Result<i64, AppError> {
        tracing::debug!(first_name = %entry.first_name, "db: INSERT birthdays");

        let result = sqlx::query(
            "INSERT INTO birthdays (first_name, last_name, birthday) VALUES (?, ?, ?)",
        )
        .bind(&entry.first_name)
        .bind(&entry.last_name)
        .bind(entry.birthday)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, "db: birthday row inserted");

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Birthday>, AppError> {
        tracing::debug!(id, "db: SELECT birthday");

        let row: Option<Birthday> = sqlx::query_as(
            "SELECT id, first_name, last_name, birthday FROM birthdays WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        tracing::debug!(id, found = row.is_some(), "db: birthday lookup result");

        Ok(row)
    }

    async fn update(&self, id: i64, entry: &NewBirthday) -> Result<bool, AppError> {
        tracing::debug!(id, "db: UPDATE birthday");

        let result = sqlx::query(
            "UPDATE birthdays SET first_name = ?, last_name = ?, birthday = ? WHERE id = ?",
        )
        .bind(&entry.first_name)
        .bind(&entry.last_name)
        .bind(entry.birthday)
        .bind(id)
        .execute(&self.pool)
        .await?;

        let updated = result.rows_affected() > 0;
        tracing::debug!(id, updated, "db: update result");

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        tracing::debug!(id, "db: DELETE birthday");

        let result = sqlx::query("DELETE FROM birthdays WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        tracing::debug!(
            id,
            rows_affected = result.rows_affected(),
            deleted,
            "db: delete result"
        );

        Ok(deleted)
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<(Vec<Birthday>, u64), AppError> {
        tracing::debug!(offset, limit, "db: SELECT birthdays ORDER BY id");

        let mut tx = self.pool.begin().await?;

        let rows: Vec<Birthday> = sqlx::query_as(
            "SELECT id, first_name, last_name, birthday FROM birthdays \
             ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&mut *tx)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM birthdays")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        let total = total.0.max(0) as u64;
        tracing::debug!(rows_returned = rows.len(), total, "db: birthdays page fetched");

        Ok((rows, total))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
