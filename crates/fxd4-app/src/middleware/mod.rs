pub mod exception;
pub mod session;

pub use exception::{ExceptionHandler, RequestInfo};
pub use session::{SessionGuard, SessionOutcome};
