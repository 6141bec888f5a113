//! The host framework seen from the view layer
//!
//! Everything the view layer needs from the surrounding web framework is
//! passed in through [`Host`] instead of being looked up from global state.

use crate::environment::AppEnvironment;
use crate::helper::{Helper, HelperTable};
use std::path::{Path, PathBuf};
use tracing::Level;

/// The module (self-contained sub-application) serving the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module name, e.g. "blog"
    pub name: String,
    /// Directories modules live under; each is checked for `<location>/<name>/views`
    pub locations: Vec<PathBuf>,
}

impl ModuleInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locations: Vec::new(),
        }
    }

    /// Add a modules location
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.locations.push(location.into());
        self
    }

    /// Candidate `views` directories for this module, in location order
    pub fn view_dirs(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.locations
            .iter()
            .map(move |location| location.join(&self.name).join("views"))
    }
}

/// Collaborator interface provided by the host framework
pub trait Host: Send + Sync {
    /// The framework's base view directory, if one is configured
    fn view_path(&self) -> Option<&Path>;

    /// The module serving the current request, if any
    fn current_module(&self) -> Option<ModuleInfo> {
        None
    }

    /// Environment flag that gates fail-loud/fail-soft behavior
    fn environment(&self) -> AppEnvironment;

    /// Resolve a helper callable by name
    fn helper(&self, name: &str) -> Option<Helper> {
        let _ = name;
        None
    }

    /// Logging sink
    ///
    /// The default forwards to `tracing`.
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "viewkit", "{}", message),
            Level::WARN => tracing::warn!(target: "viewkit", "{}", message),
            Level::INFO => tracing::info!(target: "viewkit", "{}", message),
            Level::DEBUG => tracing::debug!(target: "viewkit", "{}", message),
            _ => tracing::trace!(target: "viewkit", "{}", message),
        }
    }
}

/// A [`Host`] with fixed values
///
/// Suitable for applications without a module system and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    view_path: Option<PathBuf>,
    module: Option<ModuleInfo>,
    environment: AppEnvironment,
    helpers: HelperTable,
}

impl StaticHost {
    pub fn new(view_path: impl Into<PathBuf>) -> Self {
        Self {
            view_path: Some(view_path.into()),
            ..Self::default()
        }
    }

    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_module(mut self, module: ModuleInfo) -> Self {
        self.module = Some(module);
        self
    }

    pub fn with_helpers(mut self, helpers: HelperTable) -> Self {
        self.helpers = helpers;
        self
    }

    pub fn helpers_mut(&mut self) -> &mut HelperTable {
        &mut self.helpers
    }
}

impl Host for StaticHost {
    fn view_path(&self) -> Option<&Path> {
        self.view_path.as_deref()
    }

    fn current_module(&self) -> Option<ModuleInfo> {
        self.module.clone()
    }

    fn environment(&self) -> AppEnvironment {
        self.environment
    }

    fn helper(&self, name: &str) -> Option<Helper> {
        self.helpers.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_module_view_dirs() {
        let module = ModuleInfo::new("blog")
            .with_location("/app/modules")
            .with_location("/vendor/modules");
        let dirs: Vec<PathBuf> = module.view_dirs().collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/app/modules/blog/views"),
                PathBuf::from("/vendor/modules/blog/views"),
            ]
        );
    }

    #[test]
    fn test_static_host() {
        let mut host = StaticHost::new("/app/views")
            .with_environment(AppEnvironment::Production)
            .with_module(ModuleInfo::new("shop"));
        host.helpers_mut().add("base_url", |_| Ok(json!("/")));

        assert_eq!(host.view_path(), Some(Path::new("/app/views")));
        assert!(host.environment().is_production());
        assert_eq!(host.current_module().unwrap().name, "shop");
        assert!(host.helper("base_url").is_some());
        assert!(host.helper("site_url").is_none());
    }

    #[test]
    fn test_default_host_has_no_view_path() {
        let host = StaticHost::default();
        assert!(host.view_path().is_none());
        assert!(host.current_module().is_none());
        assert_eq!(host.environment(), AppEnvironment::Development);
    }
}
