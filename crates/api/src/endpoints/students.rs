//! Student registry endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use univan_common::{AppError, AppResult};
use univan_core::{CreateStudentInput, Identity, UpdateStudentInput};
use univan_db::entities::student;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Full student profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub class_shift: student::ClassShift,
    pub university: String,
    pub university_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boarding_point_id: Option<String>,
    pub registered_at: String,
}

impl From<student::Model> for StudentResponse {
    fn from(model: student::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
            class_shift: model.class_shift,
            university: model.university.code().to_string(),
            university_name: model.university.display_name().to_string(),
            boarding_point_id: model.boarding_point_id,
            registered_at: model.registered_at.to_rfc3339(),
        }
    }
}

/// Nested student entry for stop rosters.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentBriefResponse {
    pub id: String,
    pub name: String,
}

impl From<student::Model> for StudentBriefResponse {
    fn from(model: student::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Register a student (admin).
async fn create_student(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateStudentInput>,
) -> AppResult<ApiResponse<StudentResponse>> {
    let student = state.student_service.create(input).await?;
    Ok(ApiResponse::ok(student.into()))
}

/// List students (admin).
async fn list_students(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<StudentResponse>>> {
    let students = state.student_service.list().await?;
    Ok(ApiResponse::ok(
        students.into_iter().map(Into::into).collect(),
    ))
}

/// The authenticated student's own profile.
async fn my_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<StudentResponse>> {
    match state.user_service.resolve_identity(&user).await? {
        Identity::Student(student) => Ok(ApiResponse::ok(student.into())),
        _ => Err(AppError::Forbidden(
            "Only students have a student profile".to_string(),
        )),
    }
}

/// Get a student (admin).
async fn get_student(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<StudentResponse>> {
    let student = state.student_service.get(&id).await?;
    Ok(ApiResponse::ok(student.into()))
}

/// Update a student (admin).
async fn update_student(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStudentInput>,
) -> AppResult<ApiResponse<StudentResponse>> {
    let student = state.student_service.update(&id, input).await?;
    Ok(ApiResponse::ok(student.into()))
}

/// Remove a student (admin).
async fn delete_student(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.student_service.delete(&id).await?;
    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/me", get(my_profile))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
