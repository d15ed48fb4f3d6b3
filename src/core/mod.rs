//! Resource duplicate detection pipeline.
//!
//! ```text
//! Solution ─► Workspace ─► Compilations ─► scan ─► extract ─► dedup ─► DuplicateGroups
//! ```
//!
//! - `workspace`: solution and project loading, source discovery
//! - `compilation`: C# parsing and the symbol model
//! - `scan`: resource accessor selection
//! - `extract`: key/value pairs from member documentation
//! - `dedup`: first-seen-wins table and value grouping

pub mod compilation;
pub mod data;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod scan;
pub mod toolchain;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;

use rayon::prelude::*;

pub use data::{DuplicateGroup, ResourceEntry};
pub use dedup::ResourceTable;
pub use error::LoadError;

use compilation::CompiledUnit;

/// Resource entries of every unit, units in the given order.
///
/// Units are traversed in parallel; the per-unit results are concatenated in
/// input order so the outcome does not depend on scheduling.
pub fn collect_entries<U: CompiledUnit + Sync>(units: &[U]) -> Vec<ResourceEntry> {
    units
        .par_iter()
        .map(|unit| {
            scan::resource_symbols(unit)
                .flat_map(extract::extract_entries)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

/// First-seen-wins table over the entries of every unit.
pub fn build_table<U: CompiledUnit + Sync>(units: &[U]) -> ResourceTable {
    collect_entries(units).into_iter().collect()
}
