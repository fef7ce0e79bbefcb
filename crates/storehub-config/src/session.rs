//! Session cookie configuration.
//!
//! - `SESSION_SECURE_COOKIE`: mark the cookie `Secure` (default: false)
//! - `SESSION_IDLE_MINUTES`: inactivity timeout (default: 120)
//! - `SESSION_REMEMBER_DAYS`: inactivity timeout when "remember me" was
//!   ticked at login (default: 30)

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub cookie_secure: bool,
    pub idle_minutes: i64,
    pub remember_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_secure: false,
            idle_minutes: 120,
            remember_days: 30,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cookie_secure: crate::env_flag("SESSION_SECURE_COOKIE", defaults.cookie_secure),
            idle_minutes: env::var("SESSION_IDLE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|minutes: &i64| *minutes > 0)
                .unwrap_or(defaults.idle_minutes),
            remember_days: env::var("SESSION_REMEMBER_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|days: &i64| *days > 0)
                .unwrap_or(defaults.remember_days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert!(!config.cookie_secure);
        assert_eq!(config.idle_minutes, 120);
        assert_eq!(config.remember_days, 30);
    }
}
