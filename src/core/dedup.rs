use indexmap::IndexMap;

use crate::core::{DuplicateGroup, ResourceEntry};

/// Resource key to value, first occurrence wins.
///
/// Multi-targeted projects compile the same accessor once per target
/// framework, so the same key routinely arrives more than once.
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    entries: IndexMap<String, String>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the key is already present or the entry is blank.
    /// Returns whether the entry was added.
    pub fn insert(&mut self, entry: ResourceEntry) -> bool {
        if entry.is_blank() || self.entries.contains_key(&entry.qualified_name) {
            return false;
        }
        self.entries.insert(entry.qualified_name, entry.value);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Values shared by more than one key.
    ///
    /// Groups follow the first appearance of their value in the table and
    /// keys keep table order, so the result is stable for a given input.
    pub fn duplicates(&self) -> Vec<DuplicateGroup> {
        let mut by_value: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for (name, value) in self.iter() {
            by_value.entry(value).or_default().push(name);
        }

        by_value
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(value, names)| DuplicateGroup {
                value: value.to_string(),
                qualified_names: names.into_iter().map(String::from).collect(),
            })
            .collect()
    }
}

impl FromIterator<ResourceEntry> for ResourceTable {
    fn from_iter<I: IntoIterator<Item = ResourceEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}
