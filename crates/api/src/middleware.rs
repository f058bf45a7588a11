//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use univan_core::{
    BoardingPointService, DriverService, PollService, StudentService, TripService, UserService,
    VoteService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub student_service: StudentService,
    pub driver_service: DriverService,
    pub boarding_point_service: BoardingPointService,
    pub poll_service: PollService,
    pub vote_service: VoteService,
    pub trip_service: TripService,
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Try to extract token from header
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
            && let Some(token) = auth_str.strip_prefix("Bearer ") {
                // Authenticate user by token
                if let Ok(user) = state.user_service.authenticate_by_token(token).await {
                    req.extensions_mut().insert(user);
                }
            }

    next.run(req).await
}
