//! Theme-aware template rendering for web frameworks
//!
//! This crate sits between a host web framework and a template engine:
//!
//! - [`PathResolver`] builds the ordered template search path from the
//!   theme directory, the host's view directory and the current module.
//! - [`ThemeManager`] owns the active theme and keeps the engine's search
//!   path in sync when it changes.
//! - [`RegistrationTable`] exposes host helpers to templates, once per name.
//! - [`Views`] is the facade: data scopes, `render` and `display`.
//!
//! Every failure is logged through the [`Host`](viewkit_core::Host). Outside
//! production it is also returned; in production the call degrades instead.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use viewkit_config::ViewsConfig;
//! use viewkit_core::{AppEnvironment, StaticHost};
//! use viewkit_views::{Scope, Views};
//!
//! let config = ViewsConfig::load("config/views.yaml")?;
//! let host = StaticHost::new("app/views").with_environment(AppEnvironment::from_env()?);
//! let mut views = Views::new(config, Arc::new(host))?;
//!
//! views.set_data("site_name", "Acme", Scope::Global);
//! let html = views.render("welcome", &data)?;
//! ```

mod error;
mod policy;
mod registry;
mod resolver;
mod theme;
mod views;

#[cfg(test)]
mod testing;

pub use error::{ViewError, ViewResult};
pub use policy::FailurePolicy;
pub use registry::RegistrationTable;
pub use resolver::PathResolver;
pub use theme::{ThemeContext, ThemeManager};
pub use views::{DataSnapshot, Scope, Views};

pub use viewkit_core::DataMap;
