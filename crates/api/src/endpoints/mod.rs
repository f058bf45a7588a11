//! API endpoints.

mod auth;
mod boarding_points;
mod drivers;
mod polls;
mod students;
mod trips;
mod users;
mod votes;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/students", students::router())
        .nest("/drivers", drivers::router())
        .nest("/boarding-points", boarding_points::router())
        .nest("/polls", polls::router())
        .nest("/votes", votes::router())
        .nest("/trips", trips::router())
}
