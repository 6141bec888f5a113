//! The render facade

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use viewkit_config::{ConfigError, ViewsConfig};
use viewkit_core::{DataMap, Host};
use viewkit_template::{MiniJinjaEngine, TemplateEngine};

use crate::error::{ViewError, ViewResult};
use crate::policy::FailurePolicy;
use crate::registry::RegistrationTable;
use crate::resolver::PathResolver;
use crate::theme::{ThemeContext, ThemeManager};

/// Where a value set through [`Views::set_data`] lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Merged into every render call of this facade
    #[default]
    Instance,
    /// Pushed into the engine, visible to every template
    Global,
}

/// Copy of the data held by a facade
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSnapshot {
    pub data: DataMap,
    pub global: DataMap,
}

/// Theme-aware rendering on top of a [`TemplateEngine`]
///
/// Construction activates the configured default theme, applies the
/// configured delimiters and registers the configured helpers. Failures go
/// through a [`FailurePolicy`] derived from the host environment: outside
/// production they are returned, in production they are logged and the
/// call degrades (`render` gives `None`, `display` gives `false`).
pub struct Views<E: TemplateEngine = MiniJinjaEngine> {
    config: ViewsConfig,
    host: Arc<dyn Host>,
    policy: FailurePolicy,
    engine: E,
    themes: ThemeManager,
    registry: RegistrationTable,
    data: DataMap,
    global: DataMap,
}

impl Views<MiniJinjaEngine> {
    /// Build a facade over a minijinja engine configured from `config`
    pub fn new(config: ViewsConfig, host: Arc<dyn Host>) -> ViewResult<Self> {
        let options = config.engine.resolve(host.environment());
        Self::with_engine(config, host, MiniJinjaEngine::new(options))
    }
}

impl<E: TemplateEngine> Views<E> {
    /// Build a facade over an already constructed engine
    pub fn with_engine(config: ViewsConfig, host: Arc<dyn Host>, mut engine: E) -> ViewResult<Self> {
        let policy = FailurePolicy::new(host.environment());

        let themes = ThemeManager::initialize(
            PathResolver::new(&config.theme_dir),
            &config.default_theme,
            host.as_ref(),
            &mut engine,
            &policy,
        )?;

        if let Err(err) = engine.set_delimiters(&config.delimiters) {
            let err = ViewError::Config(ConfigError::InvalidValue {
                key: "delimiters".to_string(),
                reason: err.to_string(),
            });
            policy.report(host.as_ref(), "Failed to apply template delimiters", err)?;
        }

        let mut registry = RegistrationTable::new();
        for name in &config.functions {
            registry.register_function(name, host.as_ref(), &mut engine, &policy)?;
        }
        for name in &config.filters {
            registry.register_filter(name, host.as_ref(), &mut engine, &policy)?;
        }

        debug!(
            theme = %themes.theme(),
            environment = %policy.environment(),
            functions = config.functions.len(),
            filters = config.filters.len(),
            "View layer ready"
        );

        Ok(Self {
            config,
            host,
            policy,
            engine,
            themes,
            registry,
            data: DataMap::new(),
            global: DataMap::new(),
        })
    }

    /// Render `template` to a string
    ///
    /// `data` is merged over the instance defaults, caller values winning.
    /// The configured file extension is appended to `template`.
    pub fn render(&mut self, template: &str, data: &DataMap) -> ViewResult<Option<String>> {
        let context = self.context(data);
        let file = self.config.template_file(template);
        trace!(template = %file, "Rendering");

        match self.engine.render(&file, &context) {
            Ok(output) => Ok(Some(output)),
            Err(err) => {
                self.policy.report(
                    self.host.as_ref(),
                    "Failed to render template",
                    ViewError::from_template(template, err),
                )?;
                Ok(None)
            }
        }
    }

    /// Render `template` straight into `out`
    ///
    /// Returns whether output was written.
    pub fn display<W: Write>(
        &mut self,
        template: &str,
        data: &DataMap,
        mut out: W,
    ) -> ViewResult<bool> {
        let context = self.context(data);
        let file = self.config.template_file(template);
        trace!(template = %file, "Displaying");

        match self.engine.display(&file, &context, &mut out) {
            Ok(()) => Ok(true),
            Err(err) => {
                self.policy.report(
                    self.host.as_ref(),
                    "Failed to display template",
                    ViewError::from_template(template, err),
                )?;
                Ok(false)
            }
        }
    }

    fn context(&self, data: &DataMap) -> DataMap {
        let mut context = self.data.clone();
        for (key, value) in data {
            context.insert(key.clone(), value.clone());
        }
        context
    }

    /// Set one value
    pub fn set_data(&mut self, name: impl Into<String>, value: impl Into<Value>, scope: Scope) {
        let name = name.into();
        let value = value.into();
        match scope {
            Scope::Instance => {
                self.data.insert(name, value);
            }
            Scope::Global => {
                self.engine.add_global(&name, value.clone());
                self.global.insert(name, value);
            }
        }
    }

    /// Set every entry of `entries`
    pub fn set_data_batch<I, K>(&mut self, entries: I, scope: Scope)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (name, value) in entries {
            self.set_data(name, value, scope);
        }
    }

    pub fn get_data(&self) -> DataSnapshot {
        DataSnapshot {
            data: self.data.clone(),
            global: self.global.clone(),
        }
    }

    /// Activate another theme; see [`ThemeManager::switch_theme`]
    pub fn switch_theme(&mut self, name: &str) -> ViewResult<()> {
        self.themes
            .switch_theme(name, self.host.as_ref(), &mut self.engine, &self.policy)
    }

    /// Expose the host helper `name` as a template function
    pub fn register_function(&mut self, name: &str) -> ViewResult<()> {
        self.registry
            .register_function(name, self.host.as_ref(), &mut self.engine, &self.policy)
    }

    /// Expose the host helper `name` as a template filter
    pub fn register_filter(&mut self, name: &str) -> ViewResult<()> {
        self.registry
            .register_filter(name, self.host.as_ref(), &mut self.engine, &self.policy)
    }

    pub fn theme(&self) -> &str {
        self.themes.theme()
    }

    pub fn theme_context(&self) -> &ThemeContext {
        self.themes.current()
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        self.themes.search_paths()
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.registry.functions()
    }

    pub fn filters(&self) -> impl Iterator<Item = &str> {
        self.registry.filters()
    }

    pub fn config(&self) -> &ViewsConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
