use fxd4_client::ClientError;
use fxd4_model::ModelError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum AppError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    #[diagnostic(code(fxd4::not_found))]
    NotFound(String),

    #[error("{message}")]
    #[diagnostic(code(fxd4::http))]
    Http { status: u16, message: String },
}

impl AppError {
    /// HTTP status to answer with. Anything without its own status is a 500.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Http {
                status, ..
            } => *status,
            Self::Model(_) | Self::Client(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
