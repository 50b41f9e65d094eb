use crate::models::{GiveawayStatus, RequirementKind};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 重复参与 / 重复投票；existing_id 指向已存在的记录，前端据此跳转
    #[error("Duplicate: {message}")]
    Duplicate {
        message: String,
        existing_id: Option<String>,
    },

    #[error("Requirement not met: {0}")]
    RequirementNotMet(RequirementKind),

    #[error("Giveaway is not active: {0}")]
    GiveawayNotActive(GiveawayStatus),

    /// Telegram 等外部能力检查失败（不可达 / 超时 / 非 ok 响应）
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    pub fn already_participated(existing_id: impl Into<String>) -> Self {
        AppError::Duplicate {
            message: "You have already participated in this giveaway.".to_string(),
            existing_id: Some(existing_id.into()),
        }
    }

    pub fn already_voted(existing_id: impl Into<String>) -> Self {
        AppError::Duplicate {
            message: "You have already voted for this participant.".to_string(),
            existing_id: Some(existing_id.into()),
        }
    }

    /// 面向用户的简短提示（不暴露存储细节）
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Duplicate { message, .. } => message.clone(),
            AppError::RequirementNotMet(kind) => kind.user_message().to_string(),
            AppError::GiveawayNotActive(status) => match status {
                GiveawayStatus::Upcoming => "This giveaway has not started yet.".to_string(),
                GiveawayStatus::Ended => "This giveaway has already ended.".to_string(),
                GiveawayStatus::Ongoing => "This giveaway is not accepting entries.".to_string(),
            },
            AppError::ProviderError(_) => {
                "Telegram is not reachable right now. Please recheck in a moment.".to_string()
            }
            AppError::DatabaseError(_) => "Database error".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE"),
            AppError::RequirementNotMet(_) => (StatusCode::FORBIDDEN, "REQUIREMENT_NOT_MET"),
            AppError::GiveawayNotActive(_) => (StatusCode::BAD_REQUEST, "GIVEAWAY_NOT_ACTIVE"),
            AppError::ProviderError(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            AppError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.status_and_code();

        match self {
            AppError::ValidationError(msg) => log::warn!("Validation error: {msg}"),
            AppError::Duplicate { message, existing_id } => {
                log::info!("Duplicate write rejected: {message} (existing: {existing_id:?})")
            }
            AppError::RequirementNotMet(kind) => log::info!("Requirement not met: {kind}"),
            AppError::ProviderError(msg) => log::error!("Provider error: {msg}"),
            AppError::DatabaseError(err) => log::error!("Database error: {err}"),
            AppError::NotFound(_) | AppError::GiveawayNotActive(_) => {}
            _ => log::error!("Internal error: {self}"),
        }

        let mut error = json!({
            "code": error_code,
            "message": self.user_message(),
        });
        match self {
            AppError::Duplicate {
                existing_id: Some(id),
                ..
            } => error["existing_id"] = json!(id),
            AppError::RequirementNotMet(kind) => error["requirement"] = json!(kind),
            AppError::GiveawayNotActive(status) => error["status"] = json!(status),
            _ => {}
        }

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": error
        }))
    }
}
