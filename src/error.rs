use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn notification<S: Into<String>>(msg: S) -> Self {
        Self::Notification(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn to_safe_string(&self) -> String {
        match self {
            Self::Database(_) => "Database operation failed".to_string(),
            Self::Anyhow(_) => "Operation failed".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors() {
        let err = AppError::invalid_input("work interval too short");
        assert_eq!(err.to_string(), "Invalid input: work interval too short");

        let err = AppError::notification("service unavailable");
        assert_eq!(err.to_string(), "Notification error: service unavailable");
    }

    #[test]
    fn test_safe_string_hides_internal_errors() {
        let err = AppError::from(anyhow::anyhow!("/home/user/secret.db locked"));
        assert_eq!(err.to_safe_string(), "Operation failed");

        let err = AppError::config("no data directory");
        assert_eq!(err.to_safe_string(), "Configuration error: no data directory");
    }
}
