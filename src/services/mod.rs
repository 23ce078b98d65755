//! Resource Services
//!
//! Typed access to the backend's auth, employee and activity endpoints. Every
//! call goes through the session coordinator.

pub mod activity;
pub mod auth;
pub mod context;
pub mod employee;

pub use activity::{ActivityService, ActivityServiceImpl};
pub use auth::{AuthService, AuthServiceImpl};
pub use context::ServiceContext;
pub use employee::{EmployeeService, EmployeeServiceImpl};
