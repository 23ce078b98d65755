//! Core Infrastructure
//!
//! HTTP transport abstraction and endpoint paths shared by the session layer
//! and services.

pub mod endpoints;
pub mod transport;

pub use endpoints::Endpoints;
pub use transport::{
    create_mock_transport, create_transport, HttpMethod, HttpRequest, HttpResponse,
    HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};
