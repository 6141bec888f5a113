//! minijinja-backed template engine
//!
//! Templates are read from an ordered list of directories; the first
//! directory holding a file wins. Compiled templates are cached by the
//! environment unless the options ask for templates to be reloaded.

use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape as MjAutoEscape, Environment, UndefinedBehavior, Value};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, trace};
use viewkit_config::{AutoEscape, Delimiters, ResolvedEngineOptions};
use viewkit_core::{DataMap, Helper};

use crate::engine::TemplateEngine;
use crate::error::{TemplateError, TemplateResult};
use crate::filters;

/// Template engine on top of a minijinja [`Environment`]
///
/// The engine provides:
/// - A loader searching every configured directory in priority order
/// - Custom syntax delimiters
/// - Host helpers as functions and filters
/// - The `htmlcompress` filter, plus `dump()` in debug mode
pub struct MiniJinjaEngine {
    env: Environment<'static>,
    options: ResolvedEngineOptions,
    search_paths: Vec<PathBuf>,
}

impl MiniJinjaEngine {
    /// Create an engine configured from resolved engine options
    pub fn new(options: ResolvedEngineOptions) -> Self {
        let mut env = Environment::new();

        // Configure environment
        env.set_debug(options.debug);
        env.set_undefined_behavior(if options.strict_variables {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Lenient
        });
        let escape = match options.autoescape {
            AutoEscape::Disabled => MjAutoEscape::None,
            AutoEscape::Html => MjAutoEscape::Html,
            AutoEscape::Json => MjAutoEscape::Json,
        };
        env.set_auto_escape_callback(move |_name| escape.clone());

        Self::register_builtins(&mut env, &options);

        let mut engine = Self {
            env,
            options,
            search_paths: Vec::new(),
        };
        engine.install_loader();
        engine
    }

    fn register_builtins(env: &mut Environment<'static>, options: &ResolvedEngineOptions) {
        env.add_filter("htmlcompress", filters::htmlcompress);

        if options.debug {
            env.add_function("dump", filters::dump);
        }
    }

    fn install_loader(&mut self) {
        let loaders: Vec<_> = self
            .search_paths
            .iter()
            .cloned()
            .map(|dir| minijinja::path_loader(dir))
            .collect();

        self.env.set_loader(move |name| {
            for load in &loaders {
                if let Some(source) = load(name)? {
                    return Ok(Some(source));
                }
            }
            Ok(None)
        });
        self.env.clear_templates();
    }

    /// The options this engine was built with
    pub fn options(&self) -> &ResolvedEngineOptions {
        &self.options
    }

    /// The current search path, highest priority first
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Returns a reference to the underlying minijinja environment
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying minijinja environment
    ///
    /// This allows registering engine-specific filters, tests or functions
    /// that do not come from the host.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    fn prepare(&mut self) {
        if self.options.reload_templates() {
            trace!("Dropping compiled templates before render");
            self.env.clear_templates();
        }
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn set_search_paths(&mut self, paths: &[PathBuf]) {
        debug!(paths = ?paths, "Setting template search paths");
        self.search_paths = paths.to_vec();
        self.install_loader();
    }

    fn set_delimiters(&mut self, delimiters: &Delimiters) -> TemplateResult<()> {
        let syntax = SyntaxConfig::builder()
            .block_delimiters(delimiters.block.0.clone(), delimiters.block.1.clone())
            .variable_delimiters(delimiters.variable.0.clone(), delimiters.variable.1.clone())
            .comment_delimiters(delimiters.comment.0.clone(), delimiters.comment.1.clone())
            .build()
            .map_err(|e| TemplateError::InvalidDelimiters {
                message: e.to_string(),
            })?;

        debug!(
            block = ?delimiters.block,
            variable = ?delimiters.variable,
            comment = ?delimiters.comment,
            "Setting syntax delimiters"
        );
        self.env.set_syntax(syntax);
        self.env.clear_templates();
        Ok(())
    }

    fn add_global(&mut self, name: &str, value: serde_json::Value) {
        self.env
            .add_global(name.to_string(), Value::from_serialize(&value));
    }

    fn add_function(&mut self, name: &str, helper: Helper) {
        debug!(name, "Adding template function");
        self.env
            .add_function(name.to_string(), filters::helper_function(helper));
    }

    fn add_filter(&mut self, name: &str, helper: Helper) {
        debug!(name, "Adding template filter");
        self.env
            .add_filter(name.to_string(), filters::helper_filter(helper));
    }

    fn render(&mut self, name: &str, context: &DataMap) -> TemplateResult<String> {
        self.prepare();
        let tmpl = self
            .env
            .get_template(name)
            .map_err(|e| TemplateError::loading(name, e))?;
        Ok(tmpl.render(context)?)
    }

    fn display(
        &mut self,
        name: &str,
        context: &DataMap,
        out: &mut dyn Write,
    ) -> TemplateResult<()> {
        self.prepare();
        let tmpl = self
            .env
            .get_template(name)
            .map_err(|e| TemplateError::loading(name, e))?;
        let output = tmpl.render(context)?;
        out.write_all(output.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|source| TemplateError::Write { source })
    }
}
