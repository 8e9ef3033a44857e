use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsterError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Invalid state: {0}")]
    State(String),

    #[error("Backend error: {backend}: {message}")]
    Backend { backend: String, message: String },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(String),
}

impl AsterError {
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

/// Constraint failures (UNIQUE, NOT NULL, CHECK, PRIMARY KEY, FOREIGN KEY) become
/// `Constraint`; everything else stays a `Database` error.
impl From<rusqlite::Error> for AsterError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref sqlite_err, ref message)
                if sqlite_err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(message.clone().unwrap_or_else(|| sqlite_err.to_string()))
            }
            other => Self::Database(other),
        }
    }
}

impl From<toml::de::Error> for AsterError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for AsterError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Toml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AsterError>;
