//! resxdup - duplicate resource value finder for .NET solutions
//!
//! resxdup loads a solution, finds the generated resource accessor types in
//! each compilation and reports resource values that are defined under more
//! than one key.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, run loop, console output)
//! - `config`: Configuration file loading and parsing
//! - `core`: Loading, scanning, extraction and deduplication pipeline

pub mod cli;
pub mod config;
pub mod core;
