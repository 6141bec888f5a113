//! Error types for the view layer

use std::path::PathBuf;
use thiserror::Error;
use viewkit_config::ConfigError;
use viewkit_template::TemplateError;

/// Result type for view operations
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors raised by theme handling, helper registration and rendering
#[derive(Debug, Error)]
pub enum ViewError {
    /// Missing or invalid static configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The requested theme directory does not exist
    #[error("theme '{theme}' does not exist in {}", path.display())]
    ThemeNotFound { theme: String, path: PathBuf },

    /// The engine could not locate the template file
    #[error("failed to load template '{template}': {source}")]
    Loader {
        template: String,
        #[source]
        source: TemplateError,
    },

    /// The template failed to compile or run
    #[error("failed to render template '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: TemplateError,
    },

    /// The host has no helper with this name
    #[error("no helper named '{name}' is provided by the host")]
    UnknownHelper { name: String },
}

impl ViewError {
    /// Classify an engine failure for `template`
    pub fn from_template(template: &str, source: TemplateError) -> Self {
        if source.is_not_found() {
            ViewError::Loader {
                template: template.to_string(),
                source,
            }
        } else {
            ViewError::Render {
                template: template.to_string(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_not_found() {
        let err = ViewError::from_template(
            "home",
            TemplateError::NotFound {
                name: "home.twig".to_string(),
            },
        );
        assert!(matches!(err, ViewError::Loader { .. }));
    }

    #[test]
    fn test_classify_render() {
        let err = ViewError::from_template(
            "home",
            TemplateError::SyntaxError {
                message: "unexpected end of input".to_string(),
            },
        );
        assert!(matches!(err, ViewError::Render { .. }));
        assert!(err.to_string().contains("home"));
    }

    #[test]
    fn test_theme_not_found_message() {
        let err = ViewError::ThemeNotFound {
            theme: "ghost".to_string(),
            path: PathBuf::from("/srv/themes/ghost"),
        };
        assert_eq!(
            err.to_string(),
            "theme 'ghost' does not exist in /srv/themes/ghost"
        );
    }
}
