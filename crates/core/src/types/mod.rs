//! Core types for Gym Roster.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod birthday;
pub mod id;
pub mod price;
pub mod status;

pub use birthday::{Birthday, BirthdayError};
pub use id::*;
pub use price::Price;
pub use status::MembershipStatus;
