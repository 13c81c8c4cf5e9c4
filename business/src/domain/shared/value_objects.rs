use serde::{Deserialize, Serialize};

/// Catalog identifier of a product, unique within a cart.
/// Stable for the whole session; surrounding whitespace is not significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Returns `None` when the identifier is blank.
    pub fn parse(id: impl AsRef<str>) -> Option<Self> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalises an external inventory identifier: blank means untracked.
pub fn normalize_external_id(external_id: Option<String>) -> Option<String> {
    external_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}
