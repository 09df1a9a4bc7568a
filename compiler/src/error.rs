use thiserror::Error;

#[derive(Debug, Error)]
pub enum DtoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Struct \"{name}\" not found in file {file}")]
    StructNotFound {
        name: String,
        file: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
