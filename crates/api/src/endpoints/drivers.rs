//! Driver registry endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use univan_common::AppResult;
use univan_core::{CreateDriverInput, UpdateDriverInput};
use univan_db::entities::driver;

use crate::{extractors::AdminUser, middleware::AppState, response::ApiResponse};

/// Driver profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    pub created_at: String,
}

impl From<driver::Model> for DriverResponse {
    fn from(model: driver::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
            license_number: model.license_number,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Register a driver (admin).
async fn create_driver(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDriverInput>,
) -> AppResult<ApiResponse<DriverResponse>> {
    let driver = state.driver_service.create(input).await?;
    Ok(ApiResponse::ok(driver.into()))
}

/// List drivers (admin).
async fn list_drivers(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<DriverResponse>>> {
    let drivers = state.driver_service.list().await?;
    Ok(ApiResponse::ok(drivers.into_iter().map(Into::into).collect()))
}

/// Get a driver (admin).
async fn get_driver(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DriverResponse>> {
    let driver = state.driver_service.get(&id).await?;
    Ok(ApiResponse::ok(driver.into()))
}

/// Update a driver (admin).
async fn update_driver(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateDriverInput>,
) -> AppResult<ApiResponse<DriverResponse>> {
    let driver = state.driver_service.update(&id, input).await?;
    Ok(ApiResponse::ok(driver.into()))
}

/// Remove a driver (admin).
async fn delete_driver(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.driver_service.delete(&id).await?;
    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route(
            "/{id}",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
}
