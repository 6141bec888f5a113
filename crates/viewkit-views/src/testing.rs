//! Test doubles for the host and the engine

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;
use viewkit_config::Delimiters;
use viewkit_core::{AppEnvironment, DataMap, Helper, HelperTable, Host, ModuleInfo};
use viewkit_template::{TemplateEngine, TemplateError, TemplateResult};

/// Host capturing everything logged through it
pub struct RecordingHost {
    view_path: Option<PathBuf>,
    environment: AppEnvironment,
    module: Option<ModuleInfo>,
    helpers: HelperTable,
    logs: Mutex<Vec<(Level, String)>>,
}

impl RecordingHost {
    pub fn new(view_path: impl Into<PathBuf>, environment: AppEnvironment) -> Self {
        Self {
            view_path: Some(view_path.into()),
            environment,
            module: None,
            helpers: HelperTable::new(),
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Add a helper returning its own name
    pub fn with_helper(mut self, name: &str) -> Self {
        let tag = name.to_string();
        self.helpers
            .add(name, move |_args| Ok(serde_json::Value::String(tag.clone())));
        self
    }

    pub fn without_view_path(mut self) -> Self {
        self.view_path = None;
        self
    }

    pub fn with_module(mut self, module: ModuleInfo) -> Self {
        self.module = Some(module);
        self
    }

    /// Messages logged at ERROR
    pub fn errors(&self) -> Vec<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::ERROR)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Host for RecordingHost {
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

    fn log(&self, level: Level, message: &str) {
        self.logs
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// Engine recording every call made into it
///
/// Templates are looked up by file name in a fixed table and rendered as
/// their literal body.
#[derive(Default)]
pub struct RecordingEngine {
    templates: HashMap<String, String>,
    search_paths: Vec<PathBuf>,
    path_updates: usize,
    delimiters: Option<Delimiters>,
    globals: DataMap,
    functions: Vec<String>,
    filters: Vec<String>,
    contexts: Vec<(String, DataMap)>,
}

impl RecordingEngine {
    pub fn with_template(mut self, name: &str, body: &str) -> Self {
        self.templates.insert(name.to_string(), body.to_string());
        self
    }

    pub fn path_updates(&self) -> usize {
        self.path_updates
    }

    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.search_paths.clone()
    }

    pub fn delimiters(&self) -> Option<&Delimiters> {
        self.delimiters.as_ref()
    }

    pub fn globals(&self) -> &DataMap {
        &self.globals
    }

    pub fn functions(&self) -> Vec<String> {
        self.functions.clone()
    }

    pub fn filters(&self) -> Vec<String> {
        self.filters.clone()
    }

    /// Template names and contexts passed to render and display
    pub fn contexts(&self) -> &[(String, DataMap)] {
        &self.contexts
    }

    fn lookup(&mut self, name: &str, context: &DataMap) -> TemplateResult<String> {
        self.contexts.push((name.to_string(), context.clone()));
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound {
                name: name.to_string(),
            })
    }
}

impl TemplateEngine for RecordingEngine {
    fn set_search_paths(&mut self, paths: &[PathBuf]) {
        self.search_paths = paths.to_vec();
        self.path_updates += 1;
    }

    fn set_delimiters(&mut self, delimiters: &Delimiters) -> TemplateResult<()> {
        self.delimiters = Some(delimiters.clone());
        Ok(())
    }

    fn add_global(&mut self, name: &str, value: serde_json::Value) {
        self.globals.insert(name.to_string(), value);
    }

    fn add_function(&mut self, name: &str, _helper: Helper) {
        self.functions.push(name.to_string());
    }

    fn add_filter(&mut self, name: &str, _helper: Helper) {
        self.filters.push(name.to_string());
    }

    fn render(&mut self, name: &str, context: &DataMap) -> TemplateResult<String> {
        self.lookup(name, context)
    }

    fn display(
        &mut self,
        name: &str,
        context: &DataMap,
        out: &mut dyn Write,
    ) -> TemplateResult<()> {
        let body = self.lookup(name, context)?;
        out.write_all(body.as_bytes())
            .map_err(|source| TemplateError::Write { source })
    }
}
