use serde::{Deserialize, Serialize};

/// Free-tier operations allowed before the caller must upgrade.
pub const FREE_USAGE_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Premium,
}

/// Caller identity and quota state, attached to each authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
    pub plan: Plan,
    pub free_usage: u32,
}

impl UserContext {
    pub fn is_premium(&self) -> bool {
        self.plan == Plan::Premium
    }

    pub fn quota_exhausted(&self) -> bool {
        !self.is_premium() && self.free_usage >= FREE_USAGE_LIMIT
    }
}
