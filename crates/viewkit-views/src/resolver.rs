//! Template search path resolution

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::trace;
use viewkit_config::ConfigError;
use viewkit_core::ModuleInfo;

use crate::error::ViewResult;

/// Builds the ordered template search path for a theme
///
/// The result is, highest priority first:
///
/// 1. `theme_dir/<theme>`
/// 2. the host's base view directory
/// 3. `<location>/<module>/views` for every module location that has one
///
/// Duplicates are dropped keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    theme_dir: PathBuf,
}

impl PathResolver {
    pub fn new(theme_dir: impl Into<PathBuf>) -> Self {
        Self {
            theme_dir: theme_dir.into(),
        }
    }

    pub fn theme_dir(&self) -> &Path {
        &self.theme_dir
    }

    /// Directory of the named theme
    pub fn theme_path(&self, theme: &str) -> PathBuf {
        self.theme_dir.join(theme)
    }

    /// Resolve the search path for `theme`
    ///
    /// The theme directory is not checked for existence; module view
    /// directories are only included when they exist.
    pub fn resolve(
        &self,
        view_path: Option<&Path>,
        theme: &str,
        module: Option<&ModuleInfo>,
    ) -> ViewResult<Vec<PathBuf>> {
        let view_path = view_path
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::MissingValue {
                key: "view_path".to_string(),
            })?;

        let mut paths = IndexSet::new();
        paths.insert(self.theme_path(theme));
        paths.insert(view_path.to_path_buf());

        if let Some(module) = module {
            for dir in module.view_dirs() {
                if dir.is_dir() {
                    paths.insert(dir);
                } else {
                    trace!(module = %module.name, dir = %dir.display(), "Module has no views here");
                }
            }
        }

        Ok(paths
            .into_iter()
            .filter(|path| !path.as_os_str().is_empty())
            .collect())
    }
}
