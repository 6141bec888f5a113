//! Names registered as template functions and filters

use indexmap::IndexSet;
use tracing::{debug, trace};
use viewkit_core::Host;
use viewkit_template::TemplateEngine;

use crate::error::{ViewError, ViewResult};
use crate::policy::FailurePolicy;

/// Tracks which host helpers the engine already knows about
///
/// Each name reaches the engine at most once per kind. Names are never
/// removed.
#[derive(Debug, Default, Clone)]
pub struct RegistrationTable {
    functions: IndexSet<String>,
    filters: IndexSet<String>,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Function,
    Filter,
}

impl RegistrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose the host helper `name` as a template function
    pub fn register_function<E: TemplateEngine + ?Sized>(
        &mut self,
        name: &str,
        host: &dyn Host,
        engine: &mut E,
        policy: &FailurePolicy,
    ) -> ViewResult<()> {
        self.register(Kind::Function, name, host, engine, policy)
    }

    /// Expose the host helper `name` as a template filter
    pub fn register_filter<E: TemplateEngine + ?Sized>(
        &mut self,
        name: &str,
        host: &dyn Host,
        engine: &mut E,
        policy: &FailurePolicy,
    ) -> ViewResult<()> {
        self.register(Kind::Filter, name, host, engine, policy)
    }

    fn register<E: TemplateEngine + ?Sized>(
        &mut self,
        kind: Kind,
        name: &str,
        host: &dyn Host,
        engine: &mut E,
        policy: &FailurePolicy,
    ) -> ViewResult<()> {
        let names = match kind {
            Kind::Function => &mut self.functions,
            Kind::Filter => &mut self.filters,
        };
        if names.contains(name) {
            trace!(name, ?kind, "Already registered");
            return Ok(());
        }

        let Some(helper) = host.helper(name) else {
            return policy.report(
                host,
                "Failed to register helper",
                ViewError::UnknownHelper {
                    name: name.to_string(),
                },
            );
        };

        match kind {
            Kind::Function => engine.add_function(name, helper),
            Kind::Filter => engine.add_filter(name, helper),
        }
        names.insert(name.to_string());
        debug!(name, ?kind, "Registered helper");
        Ok(())
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.contains(name)
    }

    /// Registered function names, in registration order
    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(String::as_str)
    }

    /// Registered filter names, in registration order
    pub fn filters(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingEngine, RecordingHost};
    use viewkit_core::AppEnvironment;

    fn host(environment: AppEnvironment) -> RecordingHost {
        RecordingHost::new("/app/views", environment)
            .with_helper("base_url")
            .with_helper("upper")
    }

    #[test]
    fn test_register_function_once() {
        let host = host(AppEnvironment::Development);
        let policy = FailurePolicy::new(AppEnvironment::Development);
        let mut engine = RecordingEngine::default();
        let mut table = RegistrationTable::new();

        table
            .register_function("base_url", &host, &mut engine, &policy)
            .unwrap();
        table
            .register_function("base_url", &host, &mut engine, &policy)
            .unwrap();

        assert_eq!(engine.functions(), vec!["base_url".to_string()]);
        assert_eq!(table.functions().collect::<Vec<_>>(), vec!["base_url"]);
        assert!(table.has_function("base_url"));
        assert!(!table.has_filter("base_url"));
    }

    #[test]
    fn test_function_and_filter_are_separate() {
        let host = host(AppEnvironment::Development);
        let policy = FailurePolicy::new(AppEnvironment::Development);
        let mut engine = RecordingEngine::default();
        let mut table = RegistrationTable::new();

        table
            .register_function("upper", &host, &mut engine, &policy)
            .unwrap();
        table
            .register_filter("upper", &host, &mut engine, &policy)
            .unwrap();
        table
            .register_filter("upper", &host, &mut engine, &policy)
            .unwrap();

        assert_eq!(engine.functions(), vec!["upper".to_string()]);
        assert_eq!(engine.filters(), vec!["upper".to_string()]);
    }

    #[test]
    fn test_unknown_helper() {
        let host = host(AppEnvironment::Development);
        let policy = FailurePolicy::new(AppEnvironment::Development);
        let mut engine = RecordingEngine::default();
        let mut table = RegistrationTable::new();

        let err = table
            .register_function("missing", &host, &mut engine, &policy)
            .unwrap_err();
        assert!(matches!(err, ViewError::UnknownHelper { ref name } if name == "missing"));
        assert!(!table.has_function("missing"));
        assert!(engine.functions().is_empty());
    }

    #[test]
    fn test_unknown_helper_in_production() {
        let host = host(AppEnvironment::Production);
        let policy = FailurePolicy::new(AppEnvironment::Production);
        let mut engine = RecordingEngine::default();
        let mut table = RegistrationTable::new();

        table
            .register_filter("missing", &host, &mut engine, &policy)
            .unwrap();
        assert_eq!(table.filters().count(), 0);
        assert_eq!(host.errors().len(), 1);
    }
}
