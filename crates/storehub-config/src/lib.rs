//! # StoreHub Config
//!
//! Configuration structures loaded from environment variables. Every struct
//! has a `from_env()` constructor that falls back to development defaults
//! when a variable is missing or unparsable.
//!
//! - [`auth`]: Password hashing cost
//! - [`cors`]: Allowed origins
//! - [`server`]: Bind address
//! - [`session`]: Session cookie and lifetime
//!
//! # Example
//!
//! ```ignore
//! use storehub_config::{AuthConfig, CorsConfig, ServerConfig, SessionConfig};
//!
//! let server = ServerConfig::from_env();
//! let listener = tokio::net::TcpListener::bind(server.address()).await?;
//! ```

pub mod auth;
pub mod cors;
pub mod server;
pub mod session;

// Re-export commonly used types at crate root
pub use auth::AuthConfig;
pub use cors::CorsConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;

/// Parses an environment flag: `true`/`1`/`yes` (any case) are true.
pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}
