//! The template engine capability interface

use std::io::Write;
use std::path::PathBuf;

use viewkit_config::Delimiters;
use viewkit_core::{DataMap, Helper};

use crate::error::TemplateResult;

/// Operations the view layer needs from a template engine
///
/// Any engine that can search an ordered list of directories, hold globals
/// and expose host helpers can sit behind this trait. Compilation and
/// caching of templates stay internal to the engine.
pub trait TemplateEngine {
    /// Replace the template search path, highest priority first
    ///
    /// Previously compiled templates must not outlive a path change.
    fn set_search_paths(&mut self, paths: &[PathBuf]);

    /// Switch the comment, block and variable delimiters
    fn set_delimiters(&mut self, delimiters: &Delimiters) -> TemplateResult<()>;

    /// Make a value visible to every template
    fn add_global(&mut self, name: &str, value: serde_json::Value);

    /// Expose a host helper as a template function named `name`
    fn add_function(&mut self, name: &str, helper: Helper);

    /// Expose a host helper as a template filter named `name`
    ///
    /// The filtered value is passed as the first argument.
    fn add_filter(&mut self, name: &str, helper: Helper);

    /// Load the template file `name` and render it with `context`
    fn render(&mut self, name: &str, context: &DataMap) -> TemplateResult<String>;

    /// Load the template file `name` and stream its output into `out`
    fn display(&mut self, name: &str, context: &DataMap, out: &mut dyn Write)
        -> TemplateResult<()>;
}
