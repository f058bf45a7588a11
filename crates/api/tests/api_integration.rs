//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together, over a
//! mock database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Extension, Router,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

use univan_api::{middleware::AppState, router as api_router};
use univan_core::{
    BoardingPointService, DriverService, PollService, StopResolver, StudentService, TripService,
    UserService, VoteService,
};
use univan_db::entities::{
    boarding_point, trip,
    user::{self, UserRole},
};
use univan_db::repositories::{
    BoardingPointRepository, DriverRepository, PollRepository, StudentRepository, TripRepository,
    UserRepository, VoteRepository,
};

/// Create test app state over the given connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let student_repo = StudentRepository::new(Arc::clone(&db));
    let driver_repo = DriverRepository::new(Arc::clone(&db));
    let boarding_point_repo = BoardingPointRepository::new(Arc::clone(&db));
    let poll_repo = PollRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let trip_repo = TripRepository::new(Arc::clone(&db));

    let user_service = UserService::new(
        user_repo.clone(),
        student_repo.clone(),
        driver_repo.clone(),
    );
    let student_service = StudentService::new(
        student_repo.clone(),
        user_repo.clone(),
        boarding_point_repo.clone(),
        user_service.clone(),
    );
    let driver_service =
        DriverService::new(driver_repo.clone(), user_repo.clone(), user_service.clone());
    let boarding_point_service = BoardingPointService::new(boarding_point_repo.clone());

    let resolver = StopResolver::new(
        vote_repo.clone(),
        student_repo.clone(),
        boarding_point_repo.clone(),
    );
    let poll_service = PollService::new(
        poll_repo.clone(),
        resolver.clone(),
        chrono_tz::America::Fortaleza,
    );
    let vote_service = VoteService::new(vote_repo, poll_repo.clone(), chrono_tz::America::Fortaleza);
    let trip_service = TripService::new(Arc::clone(&db), trip_repo, poll_repo, resolver);

    AppState {
        user_service,
        student_service,
        driver_service,
        boarding_point_service,
        poll_service,
        vote_service,
        trip_service,
    }
}

fn mock_user(role: UserRole) -> user::Model {
    user::Model {
        id: "user1".to_string(),
        username: "admin".to_string(),
        username_lower: "admin".to_string(),
        password: "argon2-hash".to_string(),
        token: Some("token1".to_string()),
        name: "Admin".to_string(),
        phone: None,
        role,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Router with no authenticated user.
fn anonymous_router(db: DatabaseConnection) -> Router {
    api_router().with_state(create_test_state(db))
}

/// Router with an authenticated user already in request extensions (the
/// auth middleware's job in production).
fn authenticated_router(db: DatabaseConnection, role: UserRole) -> Router {
    api_router()
        .layer(Extension(mock_user(role)))
        .with_state(create_test_state(db))
}

fn empty_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

#[tokio::test]
async fn test_trips_list_requires_auth() {
    let app = anonymous_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/trips")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_trips_list_returns_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<trip::Model>::new()])
        .into_connection();
    let app = authenticated_router(db, UserRole::Admin);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/trips")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_trips_list_rejects_invalid_trip_type() {
    let app = authenticated_router(empty_mock_db(), UserRole::Admin);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/trips?tripType=sideways")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_trip_requires_admin() {
    let app = authenticated_router(empty_mock_db(), UserRole::Driver);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/trips")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"pollId":"poll1","tripType":"outbound"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_boarding_points_list_returns_points() {
    let points = vec![
        boarding_point::Model {
            id: "bp1".to_string(),
            name: "Praça Central".to_string(),
            address_reference: None,
            route_order: 0,
        },
        boarding_point::Model {
            id: "bp2".to_string(),
            name: "Posto Shell".to_string(),
            address_reference: Some("Em frente à farmácia".to_string()),
            route_order: 1,
        },
    ];
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([points])
        .into_connection();
    let app = authenticated_router(db, UserRole::Student);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/boarding-points")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], "Praça Central");
    assert_eq!(data[0]["routeOrder"], 0);
    assert_eq!(data[1]["routeOrder"], 1);
}

#[tokio::test]
async fn test_signin_with_unknown_user_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = anonymous_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/signin")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"username":"ghost","password":"whatever"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_error_envelope_shape() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<trip::Model>::new()])
        .into_connection();
    let app = authenticated_router(db, UserRole::Admin);

    // Unknown trip id: TRIP_NOT_FOUND inside the structured error envelope.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/trips/missing/start")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"]["code"], "TRIP_NOT_FOUND");
}
