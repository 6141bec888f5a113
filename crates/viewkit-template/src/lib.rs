//! Template engine capability interface for viewkit
//!
//! The view layer never talks to a concrete template engine. It drives a
//! [`TemplateEngine`], which can:
//!
//! - take an ordered list of directories to search for template files
//! - switch its syntax delimiters
//! - hold global variables visible to every template
//! - expose host [`Helper`](viewkit_core::Helper)s as functions and filters
//! - render a template by name, to a string or into a writer
//!
//! [`MiniJinjaEngine`] is the default implementation. On top of the host
//! helpers it provides:
//!
//! - `| htmlcompress` - Collapse whitespace between HTML tags
//! - `dump(value)` - Pretty-printed JSON of a value (debug mode only)
//!
//! # Example
//!
//! ```ignore
//! use viewkit_template::{MiniJinjaEngine, TemplateEngine};
//!
//! let mut engine = MiniJinjaEngine::new(options);
//! engine.set_search_paths(&[theme_dir.join("default"), view_dir]);
//! let html = engine.render("welcome.twig", &data)?;
//! ```

mod engine;
mod error;
mod filters;
mod minijinja_engine;

pub use engine::TemplateEngine;
pub use error::{TemplateError, TemplateResult};
pub use minijinja_engine::MiniJinjaEngine;

// Re-export minijinja Value for convenience
pub use minijinja::Value;
