//! Poll endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use univan_common::AppResult;
use univan_core::{ResolvedStop, Stop};
use univan_db::entities::{poll, trip::TripType};

use crate::{
    endpoints::{boarding_points::BoardingPointResponse, students::StudentBriefResponse},
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Poll entry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub date: String,
    pub status: poll::PollStatus,
}

impl From<poll::Model> for PollResponse {
    fn from(model: poll::Model) -> Self {
        Self {
            id: model.id,
            date: model.date.to_string(),
            status: model.status,
        }
    }
}

/// One stop group in a poll's boarding list.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingGroupResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boarding_point: Option<BoardingPointResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_name: Option<String>,
    pub students: Vec<StudentBriefResponse>,
    pub student_count: usize,
}

impl From<ResolvedStop> for BoardingGroupResponse {
    fn from(resolved: ResolvedStop) -> Self {
        let student_count = resolved.students.len();
        let students = resolved.students.into_iter().map(Into::into).collect();
        match resolved.stop {
            Stop::Point(point) => Self {
                boarding_point: Some(point.into()),
                university: None,
                university_name: None,
                students,
                student_count,
            },
            Stop::University(u) => Self {
                boarding_point: None,
                university: Some(u.code().to_string()),
                university_name: Some(u.display_name().to_string()),
                students,
                student_count,
            },
        }
    }
}

/// List polls in date order.
async fn list_polls(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PollResponse>>> {
    let polls = state.poll_service.list().await?;
    Ok(ApiResponse::ok(polls.into_iter().map(Into::into).collect()))
}

/// Get a poll.
async fn get_poll(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PollResponse>> {
    let poll = state.poll_service.get(&id).await?;
    Ok(ApiResponse::ok(poll.into()))
}

/// Boarding list query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingListQuery {
    pub trip_type: TripType,
}

/// The grouped stop breakdown of a poll's votes for one direction.
async fn boarding_list(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BoardingListQuery>,
) -> AppResult<ApiResponse<Vec<BoardingGroupResponse>>> {
    let groups = state
        .poll_service
        .boarding_list(&id, &query.trip_type)
        .await?;
    Ok(ApiResponse::ok(groups.into_iter().map(Into::into).collect()))
}

/// Weekly provisioning response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWeeklyResponse {
    pub message: String,
    pub created_polls: Vec<String>,
    pub total: usize,
}

/// Provision this week's polls (admin).
async fn create_weekly(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<CreateWeeklyResponse>> {
    let created = state.poll_service.create_weekly().await?;
    let created_polls: Vec<String> = created.iter().map(ToString::to_string).collect();

    Ok(ApiResponse::ok(CreateWeeklyResponse {
        message: "Weekly polls created".to_string(),
        total: created_polls.len(),
        created_polls,
    }))
}

/// Cleanup response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanOldResponse {
    pub message: String,
    pub deleted_count: usize,
    pub deleted_dates: Vec<String>,
}

/// Remove stale polls (admin).
async fn clean_old(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<CleanOldResponse>> {
    let deleted = state.poll_service.clean_old().await?;
    let deleted_dates: Vec<String> = deleted.iter().map(ToString::to_string).collect();

    Ok(ApiResponse::ok(CleanOldResponse {
        message: "Old polls removed".to_string(),
        deleted_count: deleted_dates.len(),
        deleted_dates,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_polls))
        .route("/create-weekly", post(create_weekly))
        .route("/clean-old", post(clean_old))
        .route("/{id}", get(get_poll))
        .route("/{id}/boarding-list", get(boarding_list))
}
