//! Authentication module
//!
//! JWT-based session handling and route guards:
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - acting user context, injected per request
//! - [`require_auth`] - authentication middleware
//! - [`require_admin`] - admin-only middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
