//! Driver service.

use univan_common::{AppResult, IdGenerator};
use univan_db::{
    entities::{driver, user::UserRole},
    repositories::{DriverRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::user::{CreateUserInput, UserService};

/// Driver service for registry management.
#[derive(Clone)]
pub struct DriverService {
    driver_repo: DriverRepository,
    user_repo: UserRepository,
    user_service: UserService,
    id_gen: IdGenerator,
}

/// Input for registering a driver (account + profile).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 32))]
    pub license_number: Option<String>,
}

/// Input for updating a driver profile.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDriverInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 32))]
    pub license_number: Option<String>,
}

impl DriverService {
    /// Create a new driver service.
    #[must_use]
    pub const fn new(
        driver_repo: DriverRepository,
        user_repo: UserRepository,
        user_service: UserService,
    ) -> Self {
        Self {
            driver_repo,
            user_repo,
            user_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a driver: the credential row first, then the profile.
    pub async fn create(&self, input: CreateDriverInput) -> AppResult<driver::Model> {
        input.validate()?;

        let user = self
            .user_service
            .create(CreateUserInput {
                username: input.username,
                password: input.password,
                name: input.name.clone(),
                phone: input.phone.clone(),
                role: UserRole::Driver,
            })
            .await?;

        let model = driver::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user.id),
            name: Set(input.name),
            phone: Set(input.phone),
            license_number: Set(input.license_number),
            created_at: Set(chrono::Utc::now().into()),
        };

        let driver = self.driver_repo.create(model).await?;
        tracing::info!(driver_id = %driver.id, "Driver registered");
        Ok(driver)
    }

    /// Get a driver by ID.
    pub async fn get(&self, id: &str) -> AppResult<driver::Model> {
        self.driver_repo.get_by_id(id).await
    }

    /// List all drivers, alphabetically.
    pub async fn list(&self) -> AppResult<Vec<driver::Model>> {
        self.driver_repo.list().await
    }

    /// Update a driver profile.
    pub async fn update(&self, id: &str, input: UpdateDriverInput) -> AppResult<driver::Model> {
        input.validate()?;

        let driver = self.driver_repo.get_by_id(id).await?;

        if input.name.is_none() && input.phone.is_none() && input.license_number.is_none() {
            return Ok(driver);
        }

        let mut active: driver::ActiveModel = driver.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(license_number) = input.license_number {
            active.license_number = Set(Some(license_number));
        }

        self.driver_repo.update(active).await
    }

    /// Delete a driver and the linked account.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let driver = self.driver_repo.get_by_id(id).await?;
        self.driver_repo.delete(&driver.id).await?;
        self.user_repo.delete(&driver.user_id).await?;
        tracing::info!(driver_id = %driver.id, "Driver removed");
        Ok(())
    }
}
