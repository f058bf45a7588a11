//! Trip repository.

use std::sync::Arc;

use crate::entities::{
    trip::{self, TripStatus, TripType},
    Trip,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    SqlErr,
};
use univan_common::{AppError, AppResult};

/// Optional predicates for listing trips.
#[derive(Debug, Clone, Default)]
pub struct TripFilters {
    /// Restrict to one poll.
    pub poll_id: Option<String>,
    /// Restrict to one direction.
    pub trip_type: Option<TripType>,
    /// Restrict to one lifecycle state.
    pub status: Option<TripStatus>,
}

/// Trip repository for database operations.
#[derive(Clone)]
pub struct TripRepository {
    db: Arc<DatabaseConnection>,
}

impl TripRepository {
    /// Create a new trip repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a trip by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<trip::Model>> {
        Trip::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a trip by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<trip::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::TripNotFound(id.to_string()))
    }

    /// Find the trip for a (poll, direction) pair.
    pub async fn find_by_poll_and_type(
        &self,
        poll_id: &str,
        trip_type: TripType,
    ) -> AppResult<Option<trip::Model>> {
        Trip::find()
            .filter(trip::Column::PollId.eq(poll_id))
            .filter(trip::Column::TripType.eq(trip_type))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List trips matching the given filters, newest first.
    pub async fn list(&self, filters: &TripFilters) -> AppResult<Vec<trip::Model>> {
        let mut query = Trip::find();

        if let Some(poll_id) = &filters.poll_id {
            query = query.filter(trip::Column::PollId.eq(poll_id));
        }
        if let Some(trip_type) = &filters.trip_type {
            query = query.filter(trip::Column::TripType.eq(trip_type.clone()));
        }
        if let Some(status) = &filters.status {
            query = query.filter(trip::Column::Status.eq(status.clone()));
        }

        query
            .order_by_desc(trip::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new trip.
    ///
    /// The unique index on (poll, trip_type) turns a racing duplicate insert
    /// into [`AppError::DuplicateTrip`].
    pub async fn create(&self, model: trip::ActiveModel) -> AppResult<trip::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::DuplicateTrip(
                    "a trip of this type already exists for this poll".to_string(),
                )
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Update a trip.
    pub async fn update(&self, model: trip::ActiveModel) -> AppResult<trip::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
