//! Host framework contracts for viewkit
//!
//! This crate provides the types through which the view layer talks to the
//! web framework hosting it: the [`Host`] trait (view directory, current
//! module, environment flag, helper lookup and logging), the
//! [`AppEnvironment`] flag that gates fail-loud/fail-soft behavior, and
//! [`Helper`] callables exposed to templates.

mod environment;
mod helper;
mod host;

pub use environment::{AppEnvironment, EnvironmentParseError, DEFAULT_ENV_VAR};
pub use helper::{Helper, HelperError, HelperTable};
pub use host::{Host, ModuleInfo, StaticHost};

/// Template data: variable name to value, insertion ordered
pub type DataMap = indexmap::IndexMap<String, serde_json::Value>;
