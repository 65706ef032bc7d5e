use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Calendar store error: {0}")]
    Store(String),

    #[error("Sheet error: {0}")]
    Sheet(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn missing_field<S: Into<String>>(msg: S) -> Self {
        Self::MissingRequiredField(msg.into())
    }

    pub fn invalid_date<S: Into<String>>(msg: S) -> Self {
        Self::InvalidDate(msg.into())
    }

    pub fn store<S: Into<String>>(msg: S) -> Self {
        Self::Store(msg.into())
    }

    pub fn sheet<S: Into<String>>(msg: S) -> Self {
        Self::Sheet(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Row-level problems the driver skips without treating the row as failed.
    pub fn is_row_skip(&self) -> bool {
        matches!(self, Self::MissingRequiredField(_) | Self::InvalidDate(_))
    }

    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Database(_) | Self::Io(_) | Self::Serialization(_) | Self::Anyhow(_) => false,
            Self::Config(_)
            | Self::MissingRequiredField(_)
            | Self::InvalidDate(_)
            | Self::Store(_)
            | Self::Sheet(_)
            | Self::NotFound(_) => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            self.to_string()
        } else {
            match self {
                Self::Database(_) => "Database operation failed".to_string(),
                Self::Io(_) => "File operation failed".to_string(),
                Self::Serialization(_) => "Workbook could not be read or written".to_string(),
                Self::Anyhow(_) => "Operation failed".to_string(),
                _ => self.to_string(),
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
