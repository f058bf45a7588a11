//! Driver repository.

use std::sync::Arc;

use crate::entities::{driver, Driver};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use univan_common::{AppError, AppResult};

/// Driver repository for database operations.
#[derive(Clone)]
pub struct DriverRepository {
    db: Arc<DatabaseConnection>,
}

impl DriverRepository {
    /// Create a new driver repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a driver by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<driver::Model>> {
        Driver::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a driver by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<driver::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver not found: {id}")))
    }

    /// Find the driver profile linked to a user account.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<driver::Model>> {
        Driver::find()
            .filter(driver::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all drivers, alphabetically.
    pub async fn list(&self) -> AppResult<Vec<driver::Model>> {
        Driver::find()
            .order_by_asc(driver::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new driver.
    pub async fn create(&self, model: driver::ActiveModel) -> AppResult<driver::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a driver.
    pub async fn update(&self, model: driver::ActiveModel) -> AppResult<driver::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a driver.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Driver::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
