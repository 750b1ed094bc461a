//! App - アプリケーション層
//!
//! ports を組み合わせて reward 計算エンジンを実装します。
//!
//! # 主要コンポーネント
//! - **TaskGovernor**: 同時実行数の上限（全サブシステム共有）
//! - **RewardEngine**: 近接判定・重複排除・非同期採点
//! - **LocationTracker**: ユーザーごとの現在地取得ループ
//! - **TourGuide**: 外部に見せる操作の表面
//! - **TourGuideBuilder**: ワイヤリングと起動時検証

pub mod builder;
pub mod config;
pub mod governor;
pub mod rewards;
pub mod scoring;
pub mod tour_guide;
pub mod tracker;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, TourGuideBuilder};
pub use self::config::{EngineConfig, ProximitySettings};
pub use self::governor::{GovernorPermit, TaskGovernor};
pub use self::rewards::{RewardEngine, load_catalog};
pub use self::scoring::{ScoringBatch, ScoringReport};
pub use self::tour_guide::TourGuide;
pub use self::tracker::{LocationTracker, TrackedLocation, TrackerHandle};
