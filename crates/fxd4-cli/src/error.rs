use fxd4_app::AppError;
use fxd4_client::ClientError;
use fxd4_config::error::ConfigError;
use fxd4_model::ModelError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    App(#[from] AppError),

    #[error("Invalid argument '{value}': {reason}")]
    #[diagnostic(code(fxd4_cli::invalid_argument))]
    InvalidArgument { value: String, reason: String },

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(
        code(fxd4_cli::invalid_payload),
        help("Pass a single JSON object with the column values")
    )]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(fxd4_cli::output))]
    Output(#[source] serde_json::Error),

    #[error("{0}")]
    #[diagnostic(code(fxd4_cli::rejected))]
    Rejected(String),
}

impl CliError {
    pub fn invalid_argument(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;
