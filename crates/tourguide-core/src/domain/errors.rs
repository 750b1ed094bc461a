//! Errors - エラー型と分類

use std::time::Duration;

use thiserror::Error;

/// ErrorKind は実行エラーの運用分類
///
/// - Transient: 外部呼び出しの一時的な失敗（再計算で回復しうる）
/// - Permanent: 入力や設定の誤り（再試行しても無意味）
/// - Cancelled: governor の待機が外部から打ち切られた
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
    Cancelled,
}

#[derive(Debug, Clone, Error)]
pub enum TourGuideError {
    #[error("permit acquisition cancelled")]
    Cancelled,

    #[error("external call timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("location source failed: {0}")]
    LocationSource(String),

    #[error("reward oracle failed: {0}")]
    Oracle(String),

    #[error("attraction catalog unavailable: {0}")]
    Catalog(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("task failed: {0}")]
    TaskFailed(String),
}

impl TourGuideError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TourGuideError::Cancelled => ErrorKind::Cancelled,
            TourGuideError::Timeout { .. }
            | TourGuideError::LocationSource(_)
            | TourGuideError::Oracle(_)
            | TourGuideError::Catalog(_)
            | TourGuideError::TaskFailed(_) => ErrorKind::Transient,
            TourGuideError::UnknownUser(_) | TourGuideError::InvalidConfig(_) => {
                ErrorKind::Permanent
            }
        }
    }
}

impl From<tokio::task::JoinError> for TourGuideError {
    fn from(err: tokio::task::JoinError) -> Self {
        TourGuideError::TaskFailed(err.to_string())
    }
}
