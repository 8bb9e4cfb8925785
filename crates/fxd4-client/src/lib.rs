pub mod auth;
pub mod client;
pub mod error;
pub mod http_client;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use auth::{AuthClient, Session, SignUpResponse};
pub use client::RemoteClient;
pub use error::{ApiError, ClientError};
pub use transport::{ApiRequest, ApiResponse, Method, RecordingTransport, Transport, UreqTransport};
