//! Identity sources

use crate::domain::OwnerResolver;

/// Resolves every caller to one configured owner
#[derive(Debug, Clone)]
pub struct StaticOwnerResolver {
    owner_id: String,
}

impl StaticOwnerResolver {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}

impl OwnerResolver for StaticOwnerResolver {
    fn owner_id(&self) -> String {
        self.owner_id.clone()
    }
}
