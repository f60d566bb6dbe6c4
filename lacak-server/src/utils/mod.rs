//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResponse`] - unified HTTP error handling
//! - [`logger`] - tracing setup
//! - [`validation`] - text length limits and validators
//! - [`time`] - timestamp and date helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use result::AppResult;
