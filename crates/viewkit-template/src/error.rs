//! Error types for template rendering

use thiserror::Error;

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while loading or rendering templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No search path contains the template
    #[error("template '{name}' not found in search paths")]
    NotFound { name: String },

    /// Invalid template syntax
    #[error("invalid template syntax: {message}")]
    SyntaxError { message: String },

    /// Undefined variable in template
    #[error("undefined variable: {message}")]
    UndefinedVariable { message: String },

    /// Failed to render template
    #[error("failed to render template: {message}")]
    RenderError { message: String },

    /// Delimiters the engine cannot use
    #[error("invalid syntax delimiters: {message}")]
    InvalidDelimiters { message: String },

    /// Failed to write rendered output
    #[error("failed to write template output: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },
}

impl TemplateError {
    /// Whether the template could not be located, as opposed to failing to compile or run
    pub fn is_not_found(&self) -> bool {
        matches!(self, TemplateError::NotFound { .. })
    }

    /// Map an error raised while fetching `name`
    pub(crate) fn loading(name: &str, err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::TemplateNotFound => TemplateError::NotFound {
                name: name.to_string(),
            },
            _ => err.into(),
        }
    }
}

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::TemplateNotFound => TemplateError::NotFound {
                name: err.name().unwrap_or_default().to_string(),
            },
            minijinja::ErrorKind::SyntaxError => TemplateError::SyntaxError {
                message: err.to_string(),
            },
            minijinja::ErrorKind::UndefinedError => TemplateError::UndefinedVariable {
                message: err.to_string(),
            },
            _ => TemplateError::RenderError {
                message: err.to_string(),
            },
        }
    }
}
