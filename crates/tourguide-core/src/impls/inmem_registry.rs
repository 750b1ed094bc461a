//! InMemoryUserRegistry - 開発用・テスト用のユーザー保存
//!
//! # 実装詳細
//! - IndexMap<String, Arc<User>> で名前 → ユーザーを登録順に保持
//! - RwLock で排他制御（ロックを await 跨ぎで保持しない）

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::domain::User;
use crate::ports::UserRegistry;

#[derive(Debug, Default)]
pub struct InMemoryUserRegistry {
    users: RwLock<IndexMap<String, Arc<User>>>,
}

impl InMemoryUserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserRegistry for InMemoryUserRegistry {
    fn all_users(&self) -> Vec<Arc<User>> {
        self.users.read().values().cloned().collect()
    }

    fn user(&self, name: &str) -> Option<Arc<User>> {
        self.users.read().get(name).cloned()
    }

    fn add_user(&self, user: Arc<User>) -> bool {
        let mut users = self.users.write();
        if users.contains_key(user.name()) {
            return false;
        }
        users.insert(user.name().to_owned(), user);
        true
    }
}
