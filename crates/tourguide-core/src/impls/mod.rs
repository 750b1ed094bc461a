//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryUserRegistry**: 名前で引けるユーザー保存
//! - **SimulatedLocationSource**: 固定カタログ + ランダム現在地
//! - **SimulatedRewardOracle**: ランダムなポイント

pub mod inmem_registry;
pub mod simulated;

// 主要な型を再エクスポート
pub use self::inmem_registry::InMemoryUserRegistry;
pub use self::simulated::{SimulatedLocationSource, SimulatedRewardOracle, default_attractions};
