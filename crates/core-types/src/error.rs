use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Validation failed for `{path}`: {message}")]
    Validation { path: String, message: String },
}

impl CoreError {
    /// The error raised when a required field is absent or empty.
    pub fn required(path: &str) -> Self {
        CoreError::Validation {
            path: path.to_string(),
            message: format!("Path `{}` is required.", path),
        }
    }
}
