// Dribbble API module.
// Provides the cached client, transport, and types for the Dribbble v1 REST API.

pub mod client;
pub mod endpoints;
pub mod transport;
pub mod types;

pub use client::DribbbleClient;
pub use endpoints::user_shots_path;
pub use transport::{ApiRequest, ReqwestTransport, Transport, TransportFailure};
pub use types::{RequestOutcome, Shot};
