//! Trip endpoints.
//!
//! The administrator surface for running a trip: create it for a poll,
//! start it, walk it stop by stop, and complete it. Students can read the
//! detail/status views to see where the shuttle is.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use univan_common::AppResult;
use univan_core::{AdvanceOutcome, ResolvedStop, Stop, StopReached, TripProgress};
use univan_db::{
    entities::trip::{self, TripStatus, TripType},
    repositories::TripFilters,
};

use crate::{
    endpoints::{boarding_points::BoardingPointResponse, students::StudentBriefResponse},
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Trip summary.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: String,
    pub poll_id: String,
    pub trip_type: TripType,
    pub status: TripStatus,
    pub current_boarding_point: Option<BoardingPointResponse>,
    pub current_university: Option<String>,
    pub current_university_name: Option<String>,
    pub total_stops: usize,
    pub current_stop_index: Option<usize>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: String,
}

/// One stop in a trip's per-stop breakdown.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStopResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boarding_point: Option<BoardingPointResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_name: Option<String>,
    pub students: Vec<StudentBriefResponse>,
    pub student_count: usize,
    pub is_current: bool,
}

/// Trip with its full per-stop breakdown.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetailResponse {
    #[serde(flatten)]
    pub trip: TripResponse,
    pub stops: Vec<TripStopResponse>,
}

fn stop_response(resolved: ResolvedStop, is_current: bool) -> TripStopResponse {
    let student_count = resolved.students.len();
    let students = resolved.students.into_iter().map(Into::into).collect();
    match resolved.stop {
        Stop::Point(point) => TripStopResponse {
            boarding_point: Some(point.into()),
            university: None,
            university_name: None,
            students,
            student_count,
            is_current,
        },
        Stop::University(u) => TripStopResponse {
            boarding_point: None,
            university: Some(u.code().to_string()),
            university_name: Some(u.display_name().to_string()),
            students,
            student_count,
            is_current,
        },
    }
}

/// Assemble a [`TripResponse`] from a trip and its resolved progress.
async fn build_trip_response(
    state: &AppState,
    trip: trip::Model,
    progress: TripProgress,
) -> AppResult<TripResponse> {
    let current_boarding_point = match &trip.current_boarding_point_id {
        Some(id) => Some(state.boarding_point_service.get(id).await?.into()),
        None => None,
    };

    Ok(TripResponse {
        id: trip.id,
        poll_id: trip.poll_id,
        trip_type: trip.trip_type,
        status: trip.status,
        current_boarding_point,
        current_university: trip.current_university.as_ref().map(|u| u.code().to_string()),
        current_university_name: trip
            .current_university
            .as_ref()
            .map(|u| u.display_name().to_string()),
        total_stops: progress.total_stops,
        current_stop_index: progress.current_index,
        started_at: trip.started_at.map(|t| t.to_rfc3339()),
        completed_at: trip.completed_at.map(|t| t.to_rfc3339()),
        created_at: trip.created_at.to_rfc3339(),
    })
}

/// Assemble a [`TripResponse`], resolving progress fresh.
async fn trip_response(state: &AppState, trip: trip::Model) -> AppResult<TripResponse> {
    let progress = state.trip_service.progress(&trip).await?;
    build_trip_response(state, trip, progress).await
}

/// Create trip request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub poll_id: String,
    pub trip_type: TripType,
}

/// Create a pending trip for a poll (admin).
async fn create_trip(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTripRequest>,
) -> AppResult<ApiResponse<TripResponse>> {
    let trip = state.trip_service.create(&req.poll_id, req.trip_type).await?;
    Ok(ApiResponse::ok(trip_response(&state, trip).await?))
}

/// Trip list query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTripsQuery {
    pub poll_id: Option<String>,
    pub trip_type: Option<TripType>,
    pub status: Option<TripStatus>,
}

/// List trips, optionally filtered by poll, direction, and status.
async fn list_trips(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListTripsQuery>,
) -> AppResult<ApiResponse<Vec<TripResponse>>> {
    let filters = TripFilters {
        poll_id: query.poll_id,
        trip_type: query.trip_type,
        status: query.status,
    };

    let trips = state.trip_service.list(&filters).await?;

    let mut responses = Vec::with_capacity(trips.len());
    for trip in trips {
        responses.push(trip_response(&state, trip).await?);
    }

    Ok(ApiResponse::ok(responses))
}

/// Trip detail: the full per-stop breakdown, regardless of status.
async fn get_trip(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TripDetailResponse>> {
    let detail = state.trip_service.detail(&id).await?;
    let current_index = detail.progress.current_index;

    let stops = detail
        .stops
        .into_iter()
        .enumerate()
        .map(|(i, resolved)| stop_response(resolved, Some(i) == current_index))
        .collect();

    let trip = build_trip_response(&state, detail.trip, detail.progress).await?;

    Ok(ApiResponse::ok(TripDetailResponse { trip, stops }))
}

/// Response for start/advance actions that land on a stop.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripActionResponse {
    pub message: String,
    pub trip: TripResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_boarding_point: Option<BoardingPointResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_university_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<StudentBriefResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_trip: Option<TripResponse>,
}

/// Fill the direction-specific stop fields of an action response.
fn apply_stop_fields(response: &mut TripActionResponse, stop: &Stop) {
    match stop {
        Stop::Point(point) => {
            response.current_boarding_point = Some(point.clone().into());
        }
        Stop::University(u) => {
            response.current_university = Some(u.code().to_string());
            response.current_university_name = Some(u.display_name().to_string());
        }
    }
}

/// Start a pending trip (admin).
async fn start_trip(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TripActionResponse>> {
    let StopReached {
        trip,
        stop,
        students,
    } = state.trip_service.start(&id).await?;

    let message = match trip.trip_type {
        TripType::Outbound => "Outbound trip started".to_string(),
        TripType::Return => "Return trip started".to_string(),
    };

    let mut response = TripActionResponse {
        message,
        trip: trip_response(&state, trip).await?,
        current_boarding_point: None,
        current_university: None,
        current_university_name: None,
        student_count: Some(students.len()),
        students: Some(students.into_iter().map(Into::into).collect()),
        completed: None,
        return_trip: None,
    };
    apply_stop_fields(&mut response, &stop);

    Ok(ApiResponse::ok(response))
}

/// Advance an in-progress trip to its next stop (admin).
async fn next_stop(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TripActionResponse>> {
    match state.trip_service.advance(&id).await? {
        AdvanceOutcome::Moved(StopReached {
            trip,
            stop,
            students,
        }) => {
            let message = match trip.trip_type {
                TripType::Outbound => "Moved to next boarding point".to_string(),
                TripType::Return => "Moved to next university".to_string(),
            };

            let mut response = TripActionResponse {
                message,
                trip: trip_response(&state, trip).await?,
                current_boarding_point: None,
                current_university: None,
                current_university_name: None,
                student_count: Some(students.len()),
                students: Some(students.into_iter().map(Into::into).collect()),
                completed: Some(false),
                return_trip: None,
            };
            apply_stop_fields(&mut response, &stop);

            Ok(ApiResponse::ok(response))
        }
        AdvanceOutcome::Completed(completed) => {
            let message = match completed.trip.trip_type {
                TripType::Outbound => "Outbound trip completed, return trip ready".to_string(),
                TripType::Return => "Return trip completed".to_string(),
            };

            let return_trip = match completed.return_trip {
                Some(t) => Some(trip_response(&state, t).await?),
                None => None,
            };

            Ok(ApiResponse::ok(TripActionResponse {
                message,
                trip: trip_response(&state, completed.trip).await?,
                current_boarding_point: None,
                current_university: None,
                current_university_name: None,
                students: None,
                student_count: None,
                completed: Some(true),
                return_trip,
            }))
        }
    }
}

/// Complete an in-progress trip early (admin).
async fn complete_trip(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TripActionResponse>> {
    let completed = state.trip_service.complete(&id).await?;

    let message = match completed.trip.trip_type {
        TripType::Outbound => "Outbound trip completed manually".to_string(),
        TripType::Return => "Return trip completed manually".to_string(),
    };

    let return_trip = match completed.return_trip {
        Some(t) => Some(trip_response(&state, t).await?),
        None => None,
    };

    Ok(ApiResponse::ok(TripActionResponse {
        message,
        trip: trip_response(&state, completed.trip).await?,
        current_boarding_point: None,
        current_university: None,
        current_university_name: None,
        students: None,
        student_count: None,
        completed: Some(true),
        return_trip,
    }))
}

/// Trip status response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStatusResponse {
    pub trip: TripResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_students: Option<Vec<StudentBriefResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_student_count: Option<usize>,
}

/// Where the trip currently is, with the students at the current stop.
async fn trip_status(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TripStatusResponse>> {
    let view = state.trip_service.status(&id).await?;

    let current_student_count = view.current_students.as_ref().map(Vec::len);
    let current_students = view
        .current_students
        .map(|students| students.into_iter().map(Into::into).collect());

    Ok(ApiResponse::ok(TripStatusResponse {
        trip: build_trip_response(&state, view.trip, view.progress).await?,
        current_students,
        current_student_count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/{id}", get(get_trip))
        .route("/{id}/start", post(start_trip))
        .route("/{id}/next-stop", post(next_stop))
        .route("/{id}/complete", post(complete_trip))
        .route("/{id}/status", get(trip_status))
}
