//! User service.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use univan_common::{AppError, AppResult, IdGenerator};
use univan_db::{
    entities::{
        driver, student,
        user::{self, UserRole},
    },
    repositories::{DriverRepository, StudentRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Who an authenticated account is, resolved once after authentication.
///
/// Handlers match on this instead of probing for related rows.
#[derive(Debug, Clone)]
pub enum Identity {
    /// A student with their registry profile.
    Student(student::Model),
    /// A driver with their registry profile.
    Driver(driver::Model),
    /// An administrator account.
    Admin(user::Model),
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    student_repo: StudentRepository,
    driver_repo: DriverRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new user account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    pub role: UserRole,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        student_repo: StudentRepository,
        driver_repo: DriverRepository,
    ) -> Self {
        Self {
            user_repo,
            student_repo,
            driver_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new account.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        // Check if username is taken
        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();

        let model = user::ActiveModel {
            id: Set(user_id),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            password: Set(password_hash),
            token: Set(Some(token)),
            name: Set(input.name),
            phone: Set(input.phone),
            role: Set(input.role),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.user_repo.create(model).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Authenticate a user by username and password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Resolve which kind of account this is. Done once per request, right
    /// after authentication.
    pub async fn resolve_identity(&self, user: &user::Model) -> AppResult<Identity> {
        match user.role {
            UserRole::Student => self
                .student_repo
                .find_by_user_id(&user.id)
                .await?
                .map(Identity::Student)
                .ok_or_else(|| {
                    AppError::Internal(format!("student account {} has no profile", user.id))
                }),
            UserRole::Driver => self
                .driver_repo
                .find_by_user_id(&user.id)
                .await?
                .map(Identity::Driver)
                .ok_or_else(|| {
                    AppError::Internal(format!("driver account {} has no profile", user.id))
                }),
            UserRole::Admin => Ok(Identity::Admin(user.clone())),
        }
    }

    /// Regenerate a user's authentication token.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;

        Ok(new_token)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_create_input_validation() {
        let input = CreateUserInput {
            username: "ana.silva".to_string(),
            password: "short".to_string(),
            name: "Ana Silva".to_string(),
            phone: None,
            role: UserRole::Student,
        };
        assert!(input.validate().is_err());

        let input = CreateUserInput {
            password: "long enough password".to_string(),
            ..input
        };
        assert!(input.validate().is_ok());
    }
}
