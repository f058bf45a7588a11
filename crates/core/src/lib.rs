//! Core business logic for univan.

pub mod services;

pub use services::*;
