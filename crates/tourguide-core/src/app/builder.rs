//! TourGuideBuilder - 協力者と設定のワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - カタログは build 時に一度だけ取得してキャッシュ

use std::sync::Arc;

use tracing::info;

use crate::app::config::{EngineConfig, ProximitySettings};
use crate::app::governor::TaskGovernor;
use crate::app::rewards::{RewardEngine, load_catalog};
use crate::app::tour_guide::TourGuide;
use crate::app::tracker::LocationTracker;
use crate::domain::TourGuideError;
use crate::ports::{LocationSource, RewardOracle, UserRegistry};

/// TourGuideBuilder はサービスを構築
///
/// # 使用例
/// ```ignore
/// let guide = TourGuideBuilder::new()
///     .config(EngineConfig::default())
///     .location_source(Arc::new(SimulatedLocationSource::new()))
///     .reward_oracle(Arc::new(SimulatedRewardOracle::new()))
///     .user_registry(Arc::new(InMemoryUserRegistry::new()))
///     .build()
///     .await?;
/// ```
///
/// # Fail-fast 設計
/// - 協力者が欠けていれば MissingComponent
/// - 設定が不正なら InvalidConfig
/// - カタログが取れなければ Catalog
pub struct TourGuideBuilder {
    config: EngineConfig,
    governor: Option<TaskGovernor>,
    location_source: Option<Arc<dyn LocationSource>>,
    reward_oracle: Option<Arc<dyn RewardOracle>>,
    user_registry: Option<Arc<dyn UserRegistry>>,
    start_tracking: bool,
}

/// BuildError はサービス構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing component: {0}. Register it on the builder before build().")]
    MissingComponent(&'static str),

    #[error(transparent)]
    InvalidConfig(TourGuideError),

    #[error(transparent)]
    Catalog(TourGuideError),
}

impl TourGuideBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            governor: None,
            location_source: None,
            reward_oracle: None,
            user_registry: None,
            start_tracking: true,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing governor instead of creating one from the config.
    pub fn governor(mut self, governor: TaskGovernor) -> Self {
        self.governor = Some(governor);
        self
    }

    pub fn location_source(mut self, source: Arc<dyn LocationSource>) -> Self {
        self.location_source = Some(source);
        self
    }

    pub fn reward_oracle(mut self, oracle: Arc<dyn RewardOracle>) -> Self {
        self.reward_oracle = Some(oracle);
        self
    }

    pub fn user_registry(mut self, registry: Arc<dyn UserRegistry>) -> Self {
        self.user_registry = Some(registry);
        self
    }

    /// Whether `build()` starts the tracking loop (default: yes).
    pub fn start_tracking(mut self, start: bool) -> Self {
        self.start_tracking = start;
        self
    }

    pub async fn build(self) -> Result<TourGuide, BuildError> {
        self.config.validate().map_err(BuildError::InvalidConfig)?;

        let source = self
            .location_source
            .ok_or(BuildError::MissingComponent("location source"))?;
        let oracle = self
            .reward_oracle
            .ok_or(BuildError::MissingComponent("reward oracle"))?;
        let registry = self
            .user_registry
            .ok_or(BuildError::MissingComponent("user registry"))?;

        let governor = self.governor.unwrap_or_else(|| {
            TaskGovernor::with_timeout(self.config.permits, self.config.call_timeout)
        });
        let catalog = load_catalog(Arc::clone(&source), &governor)
            .await
            .map_err(BuildError::Catalog)?;

        let settings = Arc::new(ProximitySettings::from_config(&self.config));
        let engine = Arc::new(RewardEngine::new(catalog, oracle, governor, settings));
        let tracker = Arc::new(LocationTracker::new(source, Arc::clone(&engine)));

        info!(
            permits = engine.governor().capacity(),
            attractions = engine.catalog().len(),
            "tour guide ready"
        );

        let guide = TourGuide::new(self.config, registry, engine, tracker);
        if self.start_tracking {
            guide.start_tracking();
        }
        Ok(guide)
    }
}

impl Default for TourGuideBuilder {
    fn default() -> Self {
        Self::new()
    }
}
