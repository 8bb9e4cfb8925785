use fxd4_config::error::ConfigError;
use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

/// Error code the resource API returns when a single-object read matched no rows.
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Error payload returned by the remote API.
///
/// The resource API reports `{ code, message, details, hint }`; the auth API
/// uses a few different shapes (`msg`, `error_description`, `error`). They are
/// all normalised into this struct.
#[derive(Error, Debug, Clone, Default, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub code: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl ApiError {
    pub fn from_body(status: u16, body: &str) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
            let message = body.trim();
            return Self {
                status,
                message: if message.is_empty() {
                    format!("HTTP {status}")
                } else {
                    message.to_string()
                },
                ..Default::default()
            };
        };

        let text = |key: &str| -> Option<String> {
            match map.get(key)? {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            }
        };

        let code = text("code")
            .or_else(|| text("error_code"))
            .or_else(|| text("error"));
        let message = text("message")
            .or_else(|| text("msg"))
            .or_else(|| text("error_description"))
            .or_else(|| text("error"))
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self {
            status,
            code,
            message,
            details: text("details"),
            hint: text("hint"),
        }
    }

    pub fn is_no_rows(&self) -> bool {
        self.code.as_deref() == Some(NO_ROWS_CODE)
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum ClientError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {url}")]
    #[diagnostic(
        code(fxd4_client::invalid_url),
        help("SUPABASE_URL must be an absolute http(s) URL")
    )]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    #[diagnostic(
        code(fxd4_client::network),
        help("Check your internet connection or try again later")
    )]
    Network(#[from] Box<ureq::Error>),

    #[error("Remote API error (HTTP {status}): {message}", status = .0.status, message = .0.message)]
    #[diagnostic(code(fxd4_client::api))]
    Api(#[from] ApiError),

    #[error("Invalid response from server: {0}")]
    #[diagnostic(code(fxd4_client::invalid_response))]
    InvalidResponse(String),

    #[error(transparent)]
    #[diagnostic(code(fxd4_client::serialization))]
    Serialization(#[from] serde_json::Error),
}

impl From<ureq::Error> for ClientError {
    fn from(e: ureq::Error) -> Self {
        Self::Network(Box::new(e))
    }
}

impl ClientError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.api().and_then(|err| err.code.as_deref())
    }

    pub fn status(&self) -> Option<u16> {
        self.api().map(|err| err.status)
    }

    /// True when a single-object read matched no rows.
    pub fn is_no_rows(&self) -> bool {
        self.api().is_some_and(ApiError::is_no_rows)
    }

    /// Message suitable for showing to an end user. Remote errors yield the
    /// server's own message without the status prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.message.clone(),
            other => other.to_string(),
        }
    }
}
