/// Errors for the few fallible edges: configuration and the browser surface.
/// Chart and generator operations themselves never fail.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    ValidationError(String),
    RenderingError(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::RenderingError(msg) => write!(f, "Rendering Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

pub type ValidationResult<T> = Result<T, AppError>;
pub type RenderingResult<T> = Result<T, AppError>;
