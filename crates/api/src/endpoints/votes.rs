//! Vote endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use univan_common::{AppError, AppResult};
use univan_core::Identity;
use univan_db::entities::{
    student,
    vote::{self, VoteOption},
};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// A cast vote.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub id: String,
    pub poll_id: String,
    pub option: VoteOption,
    pub voted_at: String,
}

impl From<vote::Model> for VoteResponse {
    fn from(model: vote::Model) -> Self {
        Self {
            id: model.id,
            poll_id: model.poll_id,
            option: model.option,
            voted_at: model.voted_at.to_rfc3339(),
        }
    }
}

/// Cast vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub poll_id: String,
    pub option: VoteOption,
}

/// Change vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeVoteRequest {
    pub option: VoteOption,
}

/// The student profile behind the authenticated account.
async fn require_student(
    state: &AppState,
    user: &univan_db::entities::user::Model,
) -> AppResult<student::Model> {
    match state.user_service.resolve_identity(user).await? {
        Identity::Student(student) => Ok(student),
        _ => Err(AppError::Forbidden("Only students can vote".to_string())),
    }
}

/// Cast the authenticated student's vote.
async fn cast_vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CastVoteRequest>,
) -> AppResult<ApiResponse<VoteResponse>> {
    let student = require_student(&state, &user).await?;
    let vote = state
        .vote_service
        .cast(&student, &req.poll_id, req.option)
        .await?;
    Ok(ApiResponse::ok(vote.into()))
}

/// List the authenticated student's votes.
async fn my_votes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VoteResponse>>> {
    let student = require_student(&state, &user).await?;
    let votes = state.vote_service.list_for_student(&student.id).await?;
    Ok(ApiResponse::ok(votes.into_iter().map(Into::into).collect()))
}

/// Change an existing vote.
async fn change_vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChangeVoteRequest>,
) -> AppResult<ApiResponse<VoteResponse>> {
    let student = require_student(&state, &user).await?;
    let vote = state.vote_service.update(&student, &id, req.option).await?;
    Ok(ApiResponse::ok(vote.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_votes).post(cast_vote))
        .route("/{id}", put(change_vote))
}
