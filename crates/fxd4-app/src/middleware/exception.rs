use std::error::Error as _;

use chrono::{SecondsFormat, Utc};
use fxd4_config::config::Config;
use tracing::error;

use crate::{
    error::AppError,
    response::{Response, View},
};

const DEBUG_VIEW: &str = "errors/debug";

/// The parts of the failing request shown on the debug page.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
}

/// Turns an unhandled [`AppError`] into the response sent to the client.
///
/// In debug mode the response is the `errors/debug` view with the full error
/// chain. Otherwise it is a minimal standalone HTML page that reveals only
/// the status.
#[derive(Debug, Clone)]
pub struct ExceptionHandler {
    debug: bool,
    app_version: String,
}

impl ExceptionHandler {
    pub fn new(debug: bool, app_version: impl Into<String>) -> Self {
        Self {
            debug,
            app_version: app_version.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.debug(), config.app_version())
    }

    pub fn handle(&self, err: &AppError, request: &RequestInfo) -> Response {
        let status = err.status();
        error!("[fxd4 Error]: {}", err);

        if self.debug {
            let view = View::new(DEBUG_VIEW)
                .with("title", "fxd4 Debugger")
                .with("message", err.to_string())
                .with("stack", error_chain(err))
                .with("status", status)
                .with("path", request.path.as_str())
                .with("method", request.method.as_str())
                .with(
                    "timestamp",
                    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                );
            return Response::Render {
                status,
                view,
            };
        }

        Response::Html {
            status,
            body: self.production_page(status),
        }
    }

    fn production_page(&self, status: u16) -> String {
        let message = if status == 404 {
            "This page could not be found"
        } else {
            "An unexpected error has occurred"
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{status}: {message}</title>
    <style>
        body {{ margin: 0; color: #000; background: #fff; font-family: -apple-system, system-ui, sans-serif; height: 100vh; display: flex; align-items: center; justify-content: center; position: relative; }}
        .error-wrapper {{ display: flex; align-items: center; }}
        h1 {{ border-right: 1px solid rgba(0, 0, 0, .3); margin: 0 20px 0 0; padding: 0 23px 0 0; font-size: 24px; font-weight: 500; }}
        h2 {{ font-size: 14px; font-weight: 400; line-height: 28px; margin: 0; }}
        .footer-brand {{ position: absolute; bottom: 24px; left: 24px; right: 24px; display: flex; justify-content: space-between; color: #d1d5db; font-size: 12px; font-weight: 500; }}
        .footer-brand span {{ color: #9ca3af; }}
    </style>
</head>
<body>
    <div class="error-wrapper">
        <h1>{status}</h1>
        <div><h2>{message}.</h2></div>
    </div>
    <div class="footer-brand">
        <div>app <span>v{app_version}</span></div>
        <div>fxd4 <span>v{framework}</span></div>
    </div>
</body>
</html>
"#,
            app_version = escape_html(&self.app_version),
            framework = env!("CARGO_PKG_VERSION"),
        )
    }
}

/// The error and each of its sources, outermost first.
fn error_chain(err: &AppError) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
