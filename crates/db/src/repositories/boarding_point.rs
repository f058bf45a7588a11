//! Boarding point repository.
//!
//! Keeps `route_order` a dense sequence starting at 0: inserting at an
//! occupied position shifts the tail up, deleting closes the gap. Each
//! renumbering runs in a transaction together with the row change itself.

use std::sync::Arc;

use crate::entities::{boarding_point, BoardingPoint};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use univan_common::{AppError, AppResult};

/// Boarding point repository for database operations.
#[derive(Clone)]
pub struct BoardingPointRepository {
    db: Arc<DatabaseConnection>,
}

impl BoardingPointRepository {
    /// Create a new boarding point repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a boarding point by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<boarding_point::Model>> {
        BoardingPoint::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a boarding point by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<boarding_point::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Boarding point not found: {id}")))
    }

    /// List all boarding points in route order.
    pub async fn list(&self) -> AppResult<Vec<boarding_point::Model>> {
        BoardingPoint::find()
            .order_by_asc(boarding_point::Column::RouteOrder)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find boarding points by IDs, in route order.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<boarding_point::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        BoardingPoint::find()
            .filter(boarding_point::Column::Id.is_in(ids.iter().cloned()))
            .order_by_asc(boarding_point::Column::RouteOrder)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of registered boarding points.
    pub async fn count(&self) -> AppResult<u64> {
        BoardingPoint::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a point at `model.route_order`, shifting the points at or
    /// after that position up by one.
    pub async fn insert_at(&self, model: boarding_point::Model) -> AppResult<boarding_point::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        BoardingPoint::update_many()
            .col_expr(
                boarding_point::Column::RouteOrder,
                Expr::col(boarding_point::Column::RouteOrder).add(1),
            )
            .filter(boarding_point::Column::RouteOrder.gte(model.route_order))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let inserted = boarding_point::ActiveModel {
            id: Set(model.id),
            name: Set(model.name),
            address_reference: Set(model.address_reference),
            route_order: Set(model.route_order),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted)
    }

    /// Move a point to a new route position, shifting the band of points
    /// between the old and new positions by one.
    pub async fn reorder(&self, id: &str, new_order: i32) -> AppResult<boarding_point::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let point = BoardingPoint::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Boarding point not found: {id}")))?;

        let old_order = point.route_order;
        if new_order == old_order {
            txn.commit()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(point);
        }

        if new_order < old_order {
            // Moving earlier: the band [new, old) slides up.
            BoardingPoint::update_many()
                .col_expr(
                    boarding_point::Column::RouteOrder,
                    Expr::col(boarding_point::Column::RouteOrder).add(1),
                )
                .filter(boarding_point::Column::RouteOrder.gte(new_order))
                .filter(boarding_point::Column::RouteOrder.lt(old_order))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        } else {
            // Moving later: the band (old, new] slides down.
            BoardingPoint::update_many()
                .col_expr(
                    boarding_point::Column::RouteOrder,
                    Expr::col(boarding_point::Column::RouteOrder).sub(1),
                )
                .filter(boarding_point::Column::RouteOrder.gt(old_order))
                .filter(boarding_point::Column::RouteOrder.lte(new_order))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let mut active: boarding_point::ActiveModel = point.into();
        active.route_order = Set(new_order);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Update name/address fields without touching the ordering.
    pub async fn update(&self, model: boarding_point::ActiveModel) -> AppResult<boarding_point::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a point and shift the points after it down by one.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let point = BoardingPoint::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Boarding point not found: {id}")))?;

        BoardingPoint::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        BoardingPoint::update_many()
            .col_expr(
                boarding_point::Column::RouteOrder,
                Expr::col(boarding_point::Column::RouteOrder).sub(1),
            )
            .filter(boarding_point::Column::RouteOrder.gt(point.route_order))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
