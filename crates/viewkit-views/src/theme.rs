//! Active theme tracking

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, instrument, trace};
use viewkit_config::ConfigError;
use viewkit_core::Host;
use viewkit_template::TemplateEngine;

use crate::error::{ViewError, ViewResult};
use crate::policy::FailurePolicy;
use crate::resolver::PathResolver;

/// The active theme and the search path derived from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeContext {
    pub theme: String,
    /// Highest priority first, index 0 is the theme directory
    pub search_paths: Vec<PathBuf>,
}

/// Owns the active theme and keeps the engine's search path in sync with it
#[derive(Debug)]
pub struct ThemeManager {
    resolver: PathResolver,
    current: ThemeContext,
}

impl ThemeManager {
    /// Activate `theme` and hand its search path to the engine
    ///
    /// A missing theme directory is reported through `policy`. When the
    /// policy lets it pass, the manager starts with the resolved paths anyway.
    pub fn initialize<E: TemplateEngine + ?Sized>(
        resolver: PathResolver,
        theme: &str,
        host: &dyn Host,
        engine: &mut E,
        policy: &FailurePolicy,
    ) -> ViewResult<Self> {
        let search_paths =
            match resolver.resolve(host.view_path(), theme, host.current_module().as_ref()) {
                Ok(paths) => paths,
                Err(err) => {
                    policy.report(host, "Failed to resolve template paths", err)?;
                    // Without a view path there is nothing to search, even in production
                    return Err(ConfigError::MissingValue {
                        key: "view_path".to_string(),
                    }
                    .into());
                }
            };
        engine.set_search_paths(&search_paths);

        let theme_path = resolver.theme_path(theme);
        if !theme_path.is_dir() {
            policy.report(
                host,
                "Failed to load the default theme",
                ViewError::ThemeNotFound {
                    theme: theme.to_string(),
                    path: theme_path,
                },
            )?;
        }

        debug!(theme, paths = search_paths.len(), "Theme initialized");

        Ok(Self {
            resolver,
            current: ThemeContext {
                theme: theme.to_string(),
                search_paths,
            },
        })
    }

    pub fn current(&self) -> &ThemeContext {
        &self.current
    }

    pub fn theme(&self) -> &str {
        &self.current.theme
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.current.search_paths
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Make `name` the active theme
    ///
    /// Switching to the active theme does nothing. The theme directory is
    /// checked before any state changes, so a failed switch keeps the
    /// previous theme.
    #[instrument(skip(self, host, engine, policy), fields(from = %self.current.theme))]
    pub fn switch_theme<E: TemplateEngine + ?Sized>(
        &mut self,
        name: &str,
        host: &dyn Host,
        engine: &mut E,
        policy: &FailurePolicy,
    ) -> ViewResult<()> {
        if name == self.current.theme {
            trace!("Theme already active");
            return Ok(());
        }

        let theme_path = self.resolver.theme_path(name);
        if name.is_empty() || !theme_path.is_dir() {
            return policy.report(
                host,
                "Theme switch failed",
                ViewError::ThemeNotFound {
                    theme: name.to_string(),
                    path: theme_path,
                },
            );
        }

        let search_paths = match self.resolver.resolve(
            host.view_path(),
            name,
            host.current_module().as_ref(),
        ) {
            Ok(paths) => paths,
            Err(err) => return policy.report(host, "Theme switch failed", err),
        };

        engine.set_search_paths(&search_paths);
        self.current = ThemeContext {
            theme: name.to_string(),
            search_paths,
        };

        debug!(paths = self.current.search_paths.len(), "Theme switched");
        Ok(())
    }
}
