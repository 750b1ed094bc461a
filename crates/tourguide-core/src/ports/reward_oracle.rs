//! RewardOracle port - attraction ごとのポイント算出
//!
//! 外部サービスは遅く、リトライもしません。失敗はその attraction だけに閉じます。

use async_trait::async_trait;

use crate::domain::{AttractionId, TourGuideError, UserId};

#[async_trait]
pub trait RewardOracle: Send + Sync {
    /// Point value of `attraction_id` for `user_id`.
    async fn points(
        &self,
        attraction_id: AttractionId,
        user_id: UserId,
    ) -> Result<i32, TourGuideError>;
}
