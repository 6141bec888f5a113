//! Configuration for viewkit
//!
//! This crate loads the static, process-lifetime configuration of the view
//! layer from YAML:
//!
//! - where compiled templates may be cached and where themes live
//! - the default theme and the template file extension
//! - syntax delimiters handed to the template engine
//! - helper functions and filters registered at startup
//! - engine options (debug, charset, caching, strict variables, escaping)
//!
//! Two custom YAML tags are understood:
//!
//! - `!include path` - Include another YAML file
//! - `!env_var VAR` or `!env_var [VAR, default]` - Environment variable substitution
//!
//! # Example
//!
//! ```ignore
//! use viewkit_config::ViewsConfig;
//!
//! let config = ViewsConfig::load("/app/config/views.yaml")?;
//! println!("themes live in {}", config.theme_dir.display());
//! ```

mod error;
mod loader;
mod views_config;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, YamlLoader};
pub use views_config::{
    AutoEscape, CacheSetting, Delimiters, EngineOptions, ResolvedEngineOptions, ViewsConfig,
    DEFAULT_FILE_EXTENSION,
};

// Re-export serde_yaml::Value for convenience
pub use serde_yaml::Value;
