//! Error codes, the application error and the JSON error body
//!
//! ```
//! use shared::error::{AppError, ErrorResponse};
//!
//! let err = AppError::validation_errors(vec!["town should not be empty".into()]);
//! let body = ErrorResponse::from_error(&err);
//! assert_eq!(body.status_code, 400);
//! assert_eq!(body.error, "Bad Request");
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorMessage, ErrorResponse};
