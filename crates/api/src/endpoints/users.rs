//! User endpoints.

use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use univan_common::AppResult;
use univan_core::Identity;

use crate::{
    endpoints::{drivers::DriverResponse, students::StudentResponse},
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
};

/// The authenticated account with its resolved profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverResponse>,
}

/// Who am I.
async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MeResponse>> {
    let identity = state.user_service.resolve_identity(&user).await?;

    let (student, driver) = match identity {
        Identity::Student(s) => (Some(StudentResponse::from(s)), None),
        Identity::Driver(d) => (None, Some(DriverResponse::from(d))),
        Identity::Admin(_) => (None, None),
    };

    Ok(ApiResponse::ok(MeResponse {
        id: user.id,
        username: user.username,
        name: user.name,
        phone: user.phone,
        role: user.role.as_str().to_string(),
        student,
        driver,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
