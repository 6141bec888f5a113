//! View layer configuration
//!
//! Parses the view configuration file: theme locations, template file
//! extension, syntax delimiters, auto-registered helpers and engine options.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use viewkit_core::AppEnvironment;

use crate::error::{ConfigError, ConfigResult};
use crate::loader::{load_yaml, YamlLoader};

/// Template file extension used when none is configured
pub const DEFAULT_FILE_EXTENSION: &str = "twig";

/// Syntax delimiter pairs handed to the template engine
///
/// Each pair is `[open, close]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    #[serde(rename = "tag_comment")]
    pub comment: (String, String),
    #[serde(rename = "tag_block")]
    pub block: (String, String),
    #[serde(rename = "tag_variable")]
    pub variable: (String, String),
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            comment: ("{#".to_string(), "#}".to_string()),
            block: ("{%".to_string(), "%}".to_string()),
            variable: ("{{".to_string(), "}}".to_string()),
        }
    }
}

impl Delimiters {
    /// Ruby erb style: `<%# %>`, `<% %>`, `<%= %>`
    pub fn erb() -> Self {
        Self {
            comment: ("<%#".to_string(), "#%>".to_string()),
            block: ("<%".to_string(), "%>".to_string()),
            variable: ("<%=".to_string(), "%>".to_string()),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        let pairs = [
            ("delimiters.tag_comment", &self.comment),
            ("delimiters.tag_block", &self.block),
            ("delimiters.tag_variable", &self.variable),
        ];
        for (key, (open, close)) in pairs {
            if open.is_empty() || close.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: "delimiters cannot be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Auto-escaping strategy applied to template output
///
/// Configured as a boolean (`true` means HTML) or one of the strategy names
/// `html`, `json` or `none`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AutoEscapeRepr", into = "AutoEscapeRepr")]
pub enum AutoEscape {
    Disabled,
    #[default]
    Html,
    Json,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AutoEscapeRepr {
    Flag(bool),
    Strategy(String),
}

impl TryFrom<AutoEscapeRepr> for AutoEscape {
    type Error = String;

    fn try_from(repr: AutoEscapeRepr) -> Result<Self, Self::Error> {
        match repr {
            AutoEscapeRepr::Flag(true) => Ok(AutoEscape::Html),
            AutoEscapeRepr::Flag(false) => Ok(AutoEscape::Disabled),
            AutoEscapeRepr::Strategy(name) => match name.to_ascii_lowercase().as_str() {
                "html" => Ok(AutoEscape::Html),
                "json" => Ok(AutoEscape::Json),
                "none" | "false" => Ok(AutoEscape::Disabled),
                other => Err(format!("unsupported autoescape strategy '{}'", other)),
            },
        }
    }
}

impl From<AutoEscape> for AutoEscapeRepr {
    fn from(value: AutoEscape) -> Self {
        match value {
            AutoEscape::Disabled => AutoEscapeRepr::Flag(false),
            AutoEscape::Html => AutoEscapeRepr::Strategy("html".to_string()),
            AutoEscape::Json => AutoEscapeRepr::Strategy("json".to_string()),
        }
    }
}

/// The `cache` engine option: a flag, or the directory compiled templates go to
///
/// A directory means caching is on; an empty one means it is off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheSetting {
    Enabled(bool),
    Directory(PathBuf),
}

impl CacheSetting {
    pub fn is_enabled(&self) -> bool {
        match self {
            CacheSetting::Enabled(flag) => *flag,
            CacheSetting::Directory(dir) => !dir.as_os_str().is_empty(),
        }
    }
}

/// Template engine options as written in the configuration
///
/// Unset options take environment-dependent defaults, see [`EngineOptions::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Attach source context to errors. Defaults to "not production".
    pub debug: Option<bool>,
    /// Template charset; only UTF-8 is supported
    pub charset: String,
    /// Keep compiled templates between renders. Defaults to "production".
    pub cache: Option<CacheSetting>,
    /// Re-read templates before every render. Defaults to `debug`.
    pub auto_reload: Option<bool>,
    /// Fail on undefined variables instead of rendering them empty
    pub strict_variables: bool,
    pub autoescape: AutoEscape,
    /// Optimization level, -1 for all; accepted for compatibility
    pub optimizations: i32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            debug: None,
            charset: "utf-8".to_string(),
            cache: None,
            auto_reload: None,
            strict_variables: false,
            autoescape: AutoEscape::Html,
            optimizations: -1,
        }
    }
}

/// Engine options with every default applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEngineOptions {
    pub debug: bool,
    pub cache: bool,
    pub auto_reload: bool,
    pub strict_variables: bool,
    pub autoescape: AutoEscape,
    pub optimizations: i32,
}

impl ResolvedEngineOptions {
    /// Whether templates must be re-read before each render
    pub fn reload_templates(&self) -> bool {
        self.auto_reload || !self.cache
    }
}

impl EngineOptions {
    /// Apply the environment-dependent defaults
    pub fn resolve(&self, environment: AppEnvironment) -> ResolvedEngineOptions {
        let debug = self.debug.unwrap_or(!environment.is_production());
        ResolvedEngineOptions {
            debug,
            cache: self
                .cache
                .as_ref()
                .map_or(environment.is_production(), CacheSetting::is_enabled),
            auto_reload: self.auto_reload.unwrap_or(debug),
            strict_variables: self.strict_variables,
            autoescape: self.autoescape,
            optimizations: self.optimizations,
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        let charset = self.charset.to_ascii_lowercase().replace('_', "-");
        if charset != "utf-8" && charset != "utf8" {
            return Err(ConfigError::InvalidValue {
                key: "engine.charset".to_string(),
                reason: format!("unsupported charset '{}', only utf-8 is supported", self.charset),
            });
        }
        if self.optimizations < -1 {
            return Err(ConfigError::InvalidValue {
                key: "engine.optimizations".to_string(),
                reason: "must be -1 (all) or a non-negative flag set".to_string(),
            });
        }
        Ok(())
    }
}

/// Static configuration of the view layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Where an engine with an on-disk cache stores compiled templates
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory containing one subdirectory per theme
    #[serde(default = "default_theme_dir")]
    pub theme_dir: PathBuf,

    /// Theme activated at startup
    #[serde(default = "default_theme")]
    pub default_theme: String,

    /// Extension appended to template names, without the dot
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    #[serde(default)]
    pub delimiters: Delimiters,

    /// Host helpers registered as template functions at startup
    #[serde(default)]
    pub functions: Vec<String>,

    /// Host helpers registered as template filters at startup
    #[serde(default)]
    pub filters: Vec<String>,

    #[serde(default, alias = "environment")]
    pub engine: EngineOptions,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache/views")
}

fn default_theme_dir() -> PathBuf {
    PathBuf::from("themes")
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_file_extension() -> String {
    DEFAULT_FILE_EXTENSION.to_string()
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            theme_dir: default_theme_dir(),
            default_theme: default_theme(),
            file_extension: default_file_extension(),
            delimiters: Delimiters::default(),
            functions: Vec::new(),
            filters: Vec::new(),
            engine: EngineOptions::default(),
        }
    }
}

impl ViewsConfig {
    /// Load configuration from a YAML file
    ///
    /// Relative `cache_dir` and `theme_dir` resolve against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = load_yaml(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_yaml(yaml, base_dir, path)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(content: &str, base_dir: impl AsRef<Path>) -> ConfigResult<Self> {
        let base_dir = base_dir.as_ref();
        let source = base_dir.join("<inline>");
        let mut loader = YamlLoader::new(base_dir);
        let yaml = loader.load_string(content, &source)?;
        Self::from_yaml(yaml, base_dir, &source)
    }

    fn from_yaml(yaml: Value, base_dir: &Path, source: &Path) -> ConfigResult<Self> {
        let yaml = match yaml {
            Value::Null => Value::Mapping(serde_yaml::Mapping::new()),
            other => other,
        };
        let mut config: ViewsConfig =
            serde_yaml::from_value(yaml).map_err(|e| ConfigError::ParseYaml {
                path: source.to_path_buf(),
                source: e,
            })?;

        config.cache_dir = resolve_dir(base_dir, &config.cache_dir);
        config.theme_dir = resolve_dir(base_dir, &config.theme_dir);
        config.validate()?;

        debug!(
            theme_dir = %config.theme_dir.display(),
            default_theme = %config.default_theme,
            functions = config.functions.len(),
            filters = config.filters.len(),
            "Loaded view configuration"
        );

        Ok(config)
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> ConfigResult<()> {
        if self.theme_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue {
                key: "theme_dir".to_string(),
            });
        }
        if self.default_theme.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                key: "default_theme".to_string(),
            });
        }
        if self.file_extension.starts_with('.') {
            return Err(ConfigError::InvalidValue {
                key: "file_extension".to_string(),
                reason: "give the extension without a leading dot".to_string(),
            });
        }
        for (key, names) in [("functions", &self.functions), ("filters", &self.filters)] {
            if names.iter().any(|name| name.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: "names cannot be empty".to_string(),
                });
            }
        }
        self.delimiters.validate()?;
        self.engine.validate()
    }

    /// Directory of the named theme
    pub fn theme_path(&self, theme: &str) -> PathBuf {
        self.theme_dir.join(theme)
    }

    /// Template file name for a template name, with the configured extension
    pub fn template_file(&self, template: &str) -> String {
        if self.file_extension.is_empty() {
            template.to_string()
        } else {
            format!("{}.{}", template, self.file_extension)
        }
    }
}

fn resolve_dir(base_dir: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() || dir.as_os_str().is_empty() {
        dir.to_path_buf()
    } else {
        base_dir.join(dir)
    }
}
