//! tourguide-core
//!
//! Concurrency-bounded reward engine for tracked users.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, geo, attraction, user, reward, errors）
//! - **ports**: 抽象化レイヤー（LocationSource, RewardOracle, UserRegistry, Clock, IdGenerator）
//! - **app**: アプリケーションロジック（governor, rewards, tracker, tour_guide, builder）
//! - **impls**: 実装（InMemoryUserRegistry, Simulated* など開発用）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

#[cfg(test)]
pub(crate) mod testkit;
