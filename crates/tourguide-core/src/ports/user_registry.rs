//! UserRegistry port - 追跡対象ユーザーの一覧
//!
//! 保存方式は問いません（本体は読み取りと追記のみ行う）。

use std::sync::Arc;

use crate::domain::User;

pub trait UserRegistry: Send + Sync {
    /// Every registered user, in registration order.
    fn all_users(&self) -> Vec<Arc<User>>;

    fn user(&self, name: &str) -> Option<Arc<User>>;

    /// Register `user` unless the name is taken. Returns `true` if added.
    fn add_user(&self, user: Arc<User>) -> bool;
}
