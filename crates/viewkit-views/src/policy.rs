//! Environment-dependent failure reporting
//!
//! Every failure is logged. Outside production it is also returned to the
//! caller; in production the caller continues with a degraded result.

use tracing::Level;
use viewkit_core::{AppEnvironment, Host};

use crate::error::{ViewError, ViewResult};

/// Decides whether a failure stops the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicy {
    environment: AppEnvironment,
}

impl FailurePolicy {
    pub fn new(environment: AppEnvironment) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Log `err` through the host, then surface or swallow it
    ///
    /// Returns `Ok(())` only in production.
    pub fn report(&self, host: &dyn Host, summary: &str, err: ViewError) -> ViewResult<()> {
        host.log(Level::ERROR, &format!("{}: {}", summary, err));
        if self.environment.is_production() {
            Ok(())
        } else {
            Err(err)
        }
    }
}
