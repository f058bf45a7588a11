//! Database entities.

pub mod boarding_point;
pub mod driver;
pub mod poll;
pub mod student;
pub mod trip;
pub mod user;
pub mod vote;

pub use boarding_point::Entity as BoardingPoint;
pub use driver::Entity as Driver;
pub use poll::Entity as Poll;
pub use student::Entity as Student;
pub use trip::Entity as Trip;
pub use user::Entity as User;
pub use vote::Entity as Vote;
