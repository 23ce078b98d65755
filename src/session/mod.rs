//! Session
//!
//! Keeps the cookie session alive across access-credential expiry.
//!
//! - **Coordinator**: single in-flight refresh, FIFO queue of parked requests
//! - **Eligibility**: which endpoints may trigger a refresh
//! - **Issuer**: login, refresh and logout exchanges with the backend

pub mod coordinator;
pub mod eligibility;
pub mod issuer;

pub use coordinator::{PendingRequest, SessionCoordinator};
pub use eligibility::RetryEligibility;
pub use issuer::{create_mock_issuer, CredentialIssuer, HttpCredentialIssuer, MockCredentialIssuer};
