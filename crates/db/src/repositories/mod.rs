//! Database repositories.

mod boarding_point;
mod driver;
mod poll;
mod student;
mod trip;
mod user;
mod vote;

pub use boarding_point::BoardingPointRepository;
pub use driver::DriverRepository;
pub use poll::PollRepository;
pub use student::StudentRepository;
pub use trip::{TripFilters, TripRepository};
pub use user::UserRepository;
pub use vote::VoteRepository;
