//! Time-Tracking Types
//!
//! Wire types exchanged with the backend and client configuration.

pub mod activity;
pub mod config;
pub mod employee;
pub mod user;

pub use activity::*;
pub use config::*;
pub use employee::*;
pub use user::*;
