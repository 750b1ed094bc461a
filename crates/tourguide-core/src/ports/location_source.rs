//! LocationSource port - GPS（現在地と attraction カタログ）
//!
//! 呼び出しは遅い可能性があるので、必ず TaskGovernor 経由で実行します。

use async_trait::async_trait;

use crate::domain::{Attraction, TourGuideError, UserId, VisitedLocation};

/// LocationSource は利用者の現在地と attraction カタログを提供
///
/// # Thread Safety
/// - `Send + Sync` を要求（tracker の各タスクから共有される）
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Current position of `user_id`, stamped with the time it was observed.
    async fn current_location(&self, user_id: UserId) -> Result<VisitedLocation, TourGuideError>;

    /// Full attraction catalog. Called once at startup; the result is cached.
    async fn attractions(&self) -> Result<Vec<Attraction>, TourGuideError>;
}
