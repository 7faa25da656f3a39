//! 作品集类型定义（外部协作方，只读）

use serde::{Deserialize, Serialize};

/// The slice of a portfolio the purchase workflow cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub user_id: String,
    pub is_published: bool,
}

impl Portfolio {
    /// Owned by `user_id` and published.
    #[must_use]
    pub fn is_eligible_for(&self, user_id: &str) -> bool {
        self.user_id == user_id && self.is_published
    }
}
