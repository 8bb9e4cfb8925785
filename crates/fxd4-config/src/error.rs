use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(fxd4_config::toml_deserialize),
        help("Check your fxd4.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(fxd4_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("SUPABASE_URL and SUPABASE_KEY are missing")]
    #[diagnostic(
        code(fxd4_config::missing_credentials),
        help("Set SUPABASE_URL and SUPABASE_KEY in the environment or in fxd4.toml")
    )]
    MissingCredentials,

    #[error("Error while reading {path}")]
    #[diagnostic(code(fxd4_config::io), help("Check the config file path and permissions"))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_message() {
        let err = ConfigError::MissingCredentials;
        assert_eq!(
            err.to_string(),
            "SUPABASE_URL and SUPABASE_KEY are missing"
        );
    }

    #[test]
    fn test_io_error_has_source() {
        let err = ConfigError::IoError {
            path: "/nonexistent/fxd4.toml".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/nonexistent/fxd4.toml"));
    }
}
