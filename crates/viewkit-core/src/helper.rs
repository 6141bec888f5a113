//! Host helper callables exposed to templates
//!
//! A helper is a host-provided function (URL builders, form widgets,
//! translations) that templates call by name. Arguments and results travel
//! as `serde_json::Value` so helpers stay independent of the template engine.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error returned by a failing helper
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HelperError {
    /// The helper was called with arguments it cannot use
    #[error("invalid argument to {helper}: {message}")]
    InvalidArgument { helper: String, message: String },

    /// The helper failed while running
    #[error("{helper} failed: {message}")]
    Failed { helper: String, message: String },
}

type HelperFn = dyn Fn(&[Value]) -> Result<Value, HelperError> + Send + Sync;

/// A named, cheaply clonable host function
#[derive(Clone)]
pub struct Helper {
    name: Arc<str>,
    func: Arc<HelperFn>,
}

impl Helper {
    /// Wrap a closure as a helper
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, HelperError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the helper with positional arguments
    pub fn call(&self, args: &[Value]) -> Result<Value, HelperError> {
        (self.func)(args)
    }
}

impl fmt::Debug for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Helper").field("name", &self.name).finish()
    }
}

/// Helpers keyed by name, in registration order
///
/// Hosts fill a table once at startup and hand it to [`StaticHost`](crate::StaticHost)
/// or consult it from their own [`Host::helper`](crate::Host::helper).
#[derive(Debug, Clone, Default)]
pub struct HelperTable {
    helpers: IndexMap<String, Helper>,
}

impl HelperTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a helper, replacing any previous helper of the same name
    pub fn insert(&mut self, helper: Helper) -> Option<Helper> {
        self.helpers.insert(helper.name().to_string(), helper)
    }

    /// Wrap a closure and add it under `name`
    pub fn add<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Value, HelperError> + Send + Sync + 'static,
    {
        self.insert(Helper::new(name, func));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Helper> {
        self.helpers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }
}
