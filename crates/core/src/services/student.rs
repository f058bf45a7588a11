//! Student service.

use univan_common::{AppResult, IdGenerator};
use univan_db::{
    entities::{
        student::{self, ClassShift, University},
        user::UserRole,
    },
    repositories::{BoardingPointRepository, StudentRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Deserializer};
use validator::Validate;

use super::user::{CreateUserInput, UserService};

/// Student service for registry management.
#[derive(Clone)]
pub struct StudentService {
    student_repo: StudentRepository,
    user_repo: UserRepository,
    boarding_point_repo: BoardingPointRepository,
    user_service: UserService,
    id_gen: IdGenerator,
}

/// Input for registering a student (account + profile).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    pub class_shift: ClassShift,

    pub university: University,

    pub boarding_point_id: Option<String>,
}

/// Input for updating a student profile.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateStudentInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    pub class_shift: Option<ClassShift>,

    pub university: Option<University>,

    /// `Some(None)` (an explicit JSON null) clears the boarding point;
    /// an absent field leaves it unchanged.
    #[serde(default, deserialize_with = "double_option")]
    pub boarding_point_id: Option<Option<String>>,
}

/// Distinguish an absent field from an explicit null.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl StudentService {
    /// Create a new student service.
    #[must_use]
    pub const fn new(
        student_repo: StudentRepository,
        user_repo: UserRepository,
        boarding_point_repo: BoardingPointRepository,
        user_service: UserService,
    ) -> Self {
        Self {
            student_repo,
            user_repo,
            boarding_point_repo,
            user_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a student: the credential row first, then the profile.
    pub async fn create(&self, input: CreateStudentInput) -> AppResult<student::Model> {
        input.validate()?;

        if let Some(point_id) = &input.boarding_point_id {
            // Reject unknown boarding points up front.
            self.boarding_point_repo.get_by_id(point_id).await?;
        }

        let user = self
            .user_service
            .create(CreateUserInput {
                username: input.username,
                password: input.password,
                name: input.name.clone(),
                phone: input.phone.clone(),
                role: UserRole::Student,
            })
            .await?;

        let model = student::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user.id),
            name: Set(input.name),
            phone: Set(input.phone),
            class_shift: Set(input.class_shift),
            university: Set(input.university),
            boarding_point_id: Set(input.boarding_point_id),
            registered_at: Set(chrono::Utc::now().into()),
        };

        let student = self.student_repo.create(model).await?;
        tracing::info!(student_id = %student.id, "Student registered");
        Ok(student)
    }

    /// Get a student by ID.
    pub async fn get(&self, id: &str) -> AppResult<student::Model> {
        self.student_repo.get_by_id(id).await
    }

    /// List all students, alphabetically.
    pub async fn list(&self) -> AppResult<Vec<student::Model>> {
        self.student_repo.list().await
    }

    /// Update a student profile.
    pub async fn update(&self, id: &str, input: UpdateStudentInput) -> AppResult<student::Model> {
        input.validate()?;

        let student = self.student_repo.get_by_id(id).await?;

        if input.name.is_none()
            && input.phone.is_none()
            && input.class_shift.is_none()
            && input.university.is_none()
            && input.boarding_point_id.is_none()
        {
            return Ok(student);
        }

        let mut active: student::ActiveModel = student.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(class_shift) = input.class_shift {
            active.class_shift = Set(class_shift);
        }
        if let Some(university) = input.university {
            active.university = Set(university);
        }
        if let Some(boarding_point_id) = input.boarding_point_id {
            if let Some(point_id) = &boarding_point_id {
                self.boarding_point_repo.get_by_id(point_id).await?;
            }
            active.boarding_point_id = Set(boarding_point_id);
        }

        self.student_repo.update(active).await
    }

    /// Delete a student and the linked account.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let student = self.student_repo.get_by_id(id).await?;
        self.student_repo.delete(&student.id).await?;
        // The account has no other profiles; drop it with the student.
        self.user_repo.delete(&student.user_id).await?;
        tracing::info!(student_id = %student.id, "Student removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_requires_name() {
        let input = CreateStudentInput {
            username: "ana.silva".to_string(),
            password: "long enough password".to_string(),
            name: String::new(),
            phone: None,
            class_shift: ClassShift::Morning,
            university: University::Uespi,
            boarding_point_id: None,
        };
        assert!(input.validate().is_err());
    }
}
