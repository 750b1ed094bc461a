//! User and attraction identifiers.
//!
//! The reward oracle is keyed by `(AttractionId, UserId)`; both are ULIDs, so
//! the phantom marker is what stops the two arguments being swapped.
//! ログでは `user-…` / `attraction-…` のプレフィックス付きで表示されます。
//! 直列化（serde）ではプレフィックスは付きません。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"user-", "attraction-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// `T` は PhantomData で、実行時にはメモリを消費しません。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// Fresh id from the system clock. Prefer an `IdGenerator` where time
    /// needs to be controlled.
    pub fn random() -> Self {
        Self::from_ulid(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// User のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum User {}

impl IdMarker for User {
    fn prefix() -> &'static str {
        "user-"
    }
}

/// Attraction のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attraction {}

impl IdMarker for Attraction {
    fn prefix() -> &'static str {
        "attraction-"
    }
}

/// Identifier of a tracked user.
pub type UserId = Id<User>;

/// Identifier of a catalog attraction.
pub type AttractionId = Id<Attraction>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let ulid1 = Ulid::new();
        let ulid2 = Ulid::new();

        let user = UserId::from_ulid(ulid1);
        let attraction = AttractionId::from_ulid(ulid2);

        assert_eq!(user.as_ulid(), ulid1);
        assert_eq!(attraction.as_ulid(), ulid2);

        assert!(user.to_string().starts_with("user-"));
        assert!(attraction.to_string().starts_with("attraction-"));

        // let _: UserId = attraction; // <- does not compile
    }

    #[test]
    fn ids_roundtrip_without_prefix() {
        let user_id = UserId::random();

        let serialized = serde_json::to_string(&user_id).unwrap();
        let deserialized: UserId = serde_json::from_str(&serialized).unwrap();

        assert_eq!(user_id, deserialized);
        assert!(!serialized.contains("user-"));
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<UserId>(), size_of::<Ulid>());
        assert_eq!(size_of::<AttractionId>(), size_of::<Ulid>());
    }
}
