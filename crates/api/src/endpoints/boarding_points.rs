//! Boarding point registry endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use univan_common::AppResult;
use univan_core::{CreateBoardingPointInput, UpdateBoardingPointInput};
use univan_db::entities::boarding_point;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Boarding point entry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingPointResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_reference: Option<String>,
    pub route_order: i32,
}

impl From<boarding_point::Model> for BoardingPointResponse {
    fn from(model: boarding_point::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address_reference: model.address_reference,
            route_order: model.route_order,
        }
    }
}

/// List boarding points in route order (any authenticated user).
async fn list_points(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<BoardingPointResponse>>> {
    let points = state.boarding_point_service.list().await?;
    Ok(ApiResponse::ok(points.into_iter().map(Into::into).collect()))
}

/// Register a boarding point (admin).
async fn create_point(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBoardingPointInput>,
) -> AppResult<ApiResponse<BoardingPointResponse>> {
    let point = state.boarding_point_service.create(input).await?;
    Ok(ApiResponse::ok(point.into()))
}

/// Get a boarding point (any authenticated user).
async fn get_point(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BoardingPointResponse>> {
    let point = state.boarding_point_service.get(&id).await?;
    Ok(ApiResponse::ok(point.into()))
}

/// Update a boarding point (admin).
async fn update_point(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateBoardingPointInput>,
) -> AppResult<ApiResponse<BoardingPointResponse>> {
    let point = state.boarding_point_service.update(&id, input).await?;
    Ok(ApiResponse::ok(point.into()))
}

/// Remove a boarding point (admin).
async fn delete_point(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.boarding_point_service.delete(&id).await?;
    Ok(crate::response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_points).post(create_point))
        .route(
            "/{id}",
            get(get_point).put(update_point).delete(delete_point),
        )
}
