use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("nesting depth {depth} exceeds sanitizer limit")]
    DepthExceeded { depth: usize },

    #[error("{type_name} is borrowed mutably and cannot be read")]
    Borrowed { type_name: String },

    #[error("sanitizer visited more than {limit} nodes")]
    NodeBudgetExceeded { limit: usize },

    #[error("cannot render {type_name}: {reason}")]
    Render { type_name: String, reason: String },

    #[error("section {section} failed: {reason}")]
    Section { section: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
