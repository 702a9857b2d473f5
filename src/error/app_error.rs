use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Upload(String),
    Database { code: String, message: String },
    Unexpected(String),
    Validation(String),
    ConfigError(String),
    InternalError(String),
}

impl AppError {
    /// Message shown to the user in the page notices.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Upload(msg) => format!("Erro ao fazer upload da imagem: {}", msg),
            AppError::Database { code, message } => {
                format!("Erro no banco de dados (Código: {}): {}", code, message)
            }
            AppError::Unexpected(msg) => format!("Erro inesperado: {}", msg),
            AppError::Validation(msg) => msg.clone(),
            AppError::ConfigError(msg) => format!("Erro de configuração: {}", msg),
            AppError::InternalError(msg) => format!("Erro interno: {}", msg),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upload(msg) => write!(f, "blob upload failed: {}", msg),
            AppError::Database { code, message } => {
                write!(f, "database error (SQLSTATE {}): {}", code, message)
            }
            AppError::Unexpected(msg) => write!(f, "unexpected error: {}", msg),
            AppError::Validation(msg) => write!(f, "validation failed: {}", msg),
            AppError::ConfigError(msg) => write!(f, "configuration error: {}", msg),
            AppError::InternalError(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => AppError::Database {
                code: db_err
                    .code()
                    .map(|code| code.into_owned())
                    .unwrap_or_else(|| "desconhecido".to_string()),
                message: db_err.message().to_string(),
            },
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::InternalError(format!("template rendering failed: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Database { ref code, .. } => {
                tracing::error!("Database error (SQLSTATE {}): {}", code, self);
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Upload(ref msg) | AppError::Unexpected(ref msg) => {
                tracing::error!("Request failed: {}", msg);
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(ref msg) | AppError::InternalError(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "message": self.user_message(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_message_carries_code() {
        let err = AppError::Database {
            code: "23505".to_string(),
            message: "duplicate key".to_string(),
        };

        let msg = err.user_message();
        assert!(msg.contains("Código: 23505"));
        assert!(msg.contains("duplicate key"));
    }

    #[test]
    fn non_database_sqlx_errors_are_unexpected() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Unexpected(_)));
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = AppError::Validation("Preencha o nome".to_string());
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Preencha o nome");
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response = AppError::Validation("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
