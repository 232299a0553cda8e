use async_trait::async_trait;

use crate::error::AppError;
use crate::models::birthday::{Birthday, NewBirthday};

#[async_trait]
pub trait BirthdayRepository: Send + Sync {
    async fn create(&self, entry: &NewBirthday) -> Result<i64, AppError>;
    async fn get(&self, id: i64) -> Result<Option<Birthday>, AppError>;
    /// Returns `false` when no row has this id.
    async fn update(&self, id: i64, entry: &NewBirthday) -> Result<bool, AppError>;
    /// Returns `false` when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
    /// One page in ascending id order, plus the total row count taken from
    /// the same snapshot.
    async fn list(&self, offset: u64, limit: u64) -> Result<(Vec<Birthday>, u64), AppError>;
    async fn health_check(&self) -> Result<(), AppError>;
}
