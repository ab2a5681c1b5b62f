//! Application-level configuration.
//!
//! - [`DispatchParams`]: router and agent loop control (iterations, timeouts, bounds)
//! - [`ReloadParams`]: hot-reload debounce

pub mod dispatch_params;

pub use dispatch_params::{DEFAULT_RESPONSE_LANGUAGE, DispatchParams};

use std::time::Duration;

/// Hot-reload behaviour.
#[derive(Debug, Clone)]
pub struct ReloadParams {
    /// Reload requests closer than this to the previous one are skipped.
    pub cooldown: Duration,
}

impl Default for ReloadParams {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(2),
        }
    }
}
