//! Boarding point service.

use univan_common::{AppResult, IdGenerator};
use univan_db::{entities::boarding_point, repositories::BoardingPointRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Boarding point service for route registry management.
#[derive(Clone)]
pub struct BoardingPointService {
    repo: BoardingPointRepository,
    id_gen: IdGenerator,
}

/// Input for registering a boarding point.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardingPointInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(max = 256))]
    pub address_reference: Option<String>,

    /// Position to insert at; appended to the end when omitted.
    #[validate(range(min = 0))]
    pub route_order: Option<i32>,
}

/// Input for updating a boarding point.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBoardingPointInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 256))]
    pub address_reference: Option<String>,

    #[validate(range(min = 0))]
    pub route_order: Option<i32>,
}

impl BoardingPointService {
    /// Create a new boarding point service.
    #[must_use]
    pub const fn new(repo: BoardingPointRepository) -> Self {
        Self {
            repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a boarding point. Inserting at an occupied position shifts
    /// the rest of the route down by one place.
    pub async fn create(&self, input: CreateBoardingPointInput) -> AppResult<boarding_point::Model> {
        input.validate()?;

        let count = i32::try_from(self.repo.count().await?).unwrap_or(i32::MAX);
        // Clamp into the dense range [0, count].
        let route_order = input.route_order.map_or(count, |o| o.min(count));

        let point = self
            .repo
            .insert_at(boarding_point::Model {
                id: self.id_gen.generate(),
                name: input.name,
                address_reference: input.address_reference,
                route_order,
            })
            .await?;

        tracing::info!(point_id = %point.id, route_order = point.route_order, "Boarding point registered");
        Ok(point)
    }

    /// Get a boarding point by ID.
    pub async fn get(&self, id: &str) -> AppResult<boarding_point::Model> {
        self.repo.get_by_id(id).await
    }

    /// List all boarding points in route order.
    pub async fn list(&self) -> AppResult<Vec<boarding_point::Model>> {
        self.repo.list().await
    }

    /// Update a boarding point; a changed `route_order` moves it within the
    /// route, renumbering the band in between.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateBoardingPointInput,
    ) -> AppResult<boarding_point::Model> {
        input.validate()?;

        let point = self.repo.get_by_id(id).await?;

        let point = if let Some(new_order) = input.route_order {
            let count = i32::try_from(self.repo.count().await?).unwrap_or(i32::MAX);
            self.repo.reorder(&point.id, new_order.min(count - 1)).await?
        } else {
            point
        };

        if input.name.is_none() && input.address_reference.is_none() {
            return Ok(point);
        }

        let mut active: boarding_point::ActiveModel = point.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(address_reference) = input.address_reference {
            active.address_reference = Set(Some(address_reference));
        }

        self.repo.update(active).await
    }

    /// Delete a boarding point, closing the gap in the route order.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(point_id = %id, "Boarding point removed");
        Ok(())
    }
}
