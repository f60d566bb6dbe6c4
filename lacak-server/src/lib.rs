//! Lacak Server - marketplace order tracking dashboard backend
//!
//! # Architecture overview
//!
//! Records orders placed on external marketplaces (Shopee / Tokopedia /
//! Blibli) and tracks their fulfillment through a fixed pipeline. Warehouse
//! and packing staff advance orders by scanning the receipt barcode or a
//! carrier tracking number; admins manage orders and staff accounts.
//!
//! # Module structure
//!
//! ```text
//! lacak-server/src/
//! ├── core/          # Config, state, HTTP server
//! ├── auth/          # JWT sessions, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, models, repositories
//! ├── orders/        # Status policy, transition engine, scan gateway
//! └── utils/         # Errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderStore, ScanService, TransitionEngine};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured warn events for auth failures
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env and initialize logging. Called once at startup, before the
/// configuration is read.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(Some(&log_level), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __                     __
   / /   ____ _ _____ ____ _ / /__
  / /   / __ `// ___// __ `// //_/
 / /___/ /_/ // /__ / /_/ // ,<
/_____/ \__,_/ \___/ \__,_//_/|_|
    "#
    );
}
