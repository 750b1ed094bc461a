//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」です。GPS、ポイント算出、ユーザー保存は
//! すべて外部の協力者として扱い、本体は trait 越しにだけ触ります。

pub mod clock;
pub mod id_generator;
pub mod location_source;
pub mod reward_oracle;
pub mod user_registry;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::location_source::LocationSource;
pub use self::reward_oracle::RewardOracle;
pub use self::user_registry::UserRegistry;
