//! Controllers and middleware of an fxd4 application.
//!
//! Handlers return a [`Response`] describing what to send back: a view to
//! render, a redirect with cookies, or a finished HTML body. Routing and
//! template rendering belong to the hosting web server.

pub mod controllers;
pub mod cookie;
pub mod error;
pub mod middleware;
pub mod response;

pub use cookie::{Cookie, SameSite};
pub use error::{AppError, Result};
pub use response::{Response, View};
