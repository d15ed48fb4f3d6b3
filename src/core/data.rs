//! Plain data produced by extraction and consumed by the deduplicator.

/// One resource key and its human-readable value, read from a member's
/// documentation summary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceEntry {
    /// Documentation ID of the member, e.g. `P:NS.Strings.Greeting`.
    pub qualified_name: String,
    pub value: String,
}

impl ResourceEntry {
    pub fn new(qualified_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            value: value.into(),
        }
    }

    /// Entries with a blank name or value never enter the resource table.
    pub fn is_blank(&self) -> bool {
        self.qualified_name.trim().is_empty() || self.value.trim().is_empty()
    }
}

/// A value shared by more than one resource key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub value: String,
    /// Keys in resource table order.
    pub qualified_names: Vec<String>,
}
