//! Error types for fxd4-model.

use fxd4_client::ClientError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ModelError {
    #[error("Query on '{resource}' failed")]
    #[diagnostic(
        code(fxd4_model::remote_query),
        help("Check the filters and that the resource exists and is readable")
    )]
    RemoteQuery {
        resource: String,
        #[source]
        source: ClientError,
    },

    #[error("Write to '{resource}' failed")]
    #[diagnostic(
        code(fxd4_model::remote_write),
        help("Check the payload and the row-level security policies on the resource")
    )]
    RemoteWrite {
        resource: String,
        #[source]
        source: ClientError,
    },
}

impl ModelError {
    pub(crate) fn query(resource: &str, source: ClientError) -> Self {
        Self::RemoteQuery {
            resource: resource.to_string(),
            source,
        }
    }

    pub(crate) fn write(resource: &str, source: ClientError) -> Self {
        Self::RemoteWrite {
            resource: resource.to_string(),
            source,
        }
    }

    /// The underlying client error.
    pub fn client_error(&self) -> &ClientError {
        match self {
            Self::RemoteQuery {
                source, ..
            }
            | Self::RemoteWrite {
                source, ..
            } => source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
