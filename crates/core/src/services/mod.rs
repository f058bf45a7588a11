//! Business logic services.

#![allow(missing_docs)]

pub mod boarding_point;
pub mod driver;
pub mod poll;
pub mod stop_resolver;
pub mod student;
pub mod trip;
pub mod user;
pub mod vote;

pub use boarding_point::{BoardingPointService, CreateBoardingPointInput, UpdateBoardingPointInput};
pub use driver::{CreateDriverInput, DriverService, UpdateDriverInput};
pub use poll::PollService;
pub use stop_resolver::{ResolvedStop, Stop, StopResolver};
pub use student::{CreateStudentInput, StudentService, UpdateStudentInput};
pub use trip::{
    AdvanceOutcome, StopReached, TripCompleted, TripDetail, TripProgress, TripService,
    TripStatusView,
};
pub use user::{CreateUserInput, Identity, UserService};
pub use vote::VoteService;
