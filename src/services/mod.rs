pub mod giveaway_service;
pub mod leaderboard_service;
pub mod participant_service;
pub mod requirement_service;
pub mod voter_service;

pub use giveaway_service::*;
pub use leaderboard_service::*;
pub use participant_service::*;
pub use requirement_service::*;
pub use voter_service::*;

/// 当前时间 (epoch 秒)
pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 唯一索引冲突（并发重复写入）
pub(crate) fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
