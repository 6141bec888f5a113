//! Shared fixtures for view integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tempfile::TempDir;
use tracing::Level;
use viewkit_config::ViewsConfig;
use viewkit_core::{AppEnvironment, DataMap, Helper, Host, ModuleInfo, StaticHost};
use viewkit_views::Views;

/// A [`StaticHost`] that also keeps what was logged
pub struct CapturingHost {
    inner: StaticHost,
    logs: Mutex<Vec<(Level, String)>>,
}

impl CapturingHost {
    pub fn new(inner: StaticHost) -> Self {
        Self {
            inner,
            logs: Mutex::new(Vec::new()),
        }
    }

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

impl Host for CapturingHost {
    fn view_path(&self) -> Option<&Path> {
        self.inner.view_path()
    }

    fn current_module(&self) -> Option<ModuleInfo> {
        self.inner.current_module()
    }

    fn environment(&self) -> AppEnvironment {
        self.inner.environment()
    }

    fn helper(&self, name: &str) -> Option<Helper> {
        self.inner.helper(name)
    }

    fn log(&self, level: Level, message: &str) {
        self.logs
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// An application tree on disk:
///
/// ```text
/// views/            base templates
/// themes/default/   default theme overrides
/// themes/dark/      second theme
/// modules/          module locations
/// ```
pub struct Site {
    pub temp_dir: TempDir,
}

impl Site {
    pub fn new() -> Self {
        let site = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        for dir in ["views", "themes/default", "themes/dark", "modules"] {
            fs::create_dir_all(site.path(dir)).unwrap();
        }
        site
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.temp_dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Configuration file `views.yaml` at the site root
    pub fn config(&self, yaml: &str) -> ViewsConfig {
        self.write("views.yaml", yaml);
        ViewsConfig::load(self.path("views.yaml")).unwrap()
    }

    /// Host with `base_url`, `upper` and `lang` helpers
    pub fn host(&self, environment: AppEnvironment) -> StaticHost {
        let mut host = StaticHost::new(self.path("views")).with_environment(environment);
        host.helpers_mut()
            .add("base_url", |args: &[Value]| {
                let path = args.first().and_then(Value::as_str).unwrap_or("");
                Ok(Value::String(format!("https://example.com/{}", path)))
            })
            .add("upper", |args: &[Value]| {
                let text = args.first().and_then(Value::as_str).unwrap_or("");
                Ok(Value::String(text.to_uppercase()))
            })
            .add("lang", |args: &[Value]| {
                let key = args.first().and_then(Value::as_str).unwrap_or("");
                Ok(Value::String(format!("[{}]", key)))
            });
        host
    }

    pub fn views(&self, yaml: &str, host: CapturingHost) -> (Views, Arc<CapturingHost>) {
        let host = Arc::new(host);
        let views = Views::new(self.config(yaml), host.clone()).unwrap();
        (views, host)
    }
}

pub fn data(value: Value) -> DataMap {
    serde_json::from_value(value).unwrap()
}
