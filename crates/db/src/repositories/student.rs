//! Student repository.

use std::sync::Arc;

use crate::entities::{student, Student};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use univan_common::{AppError, AppResult};

/// Student repository for database operations.
#[derive(Clone)]
pub struct StudentRepository {
    db: Arc<DatabaseConnection>,
}

impl StudentRepository {
    /// Create a new student repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a student by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<student::Model>> {
        Student::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a student by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<student::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student not found: {id}")))
    }

    /// Find the student profile linked to a user account.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<student::Model>> {
        Student::find()
            .filter(student::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find students by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<student::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Student::find()
            .filter(student::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all students, alphabetically.
    pub async fn list(&self) -> AppResult<Vec<student::Model>> {
        Student::find()
            .order_by_asc(student::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new student.
    pub async fn create(&self, model: student::ActiveModel) -> AppResult<student::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a student.
    pub async fn update(&self, model: student::ActiveModel) -> AppResult<student::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a student.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Student::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
