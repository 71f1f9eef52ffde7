//! Cache module - Manages the line-delimited cache file
//!
//! Provides:
//! - Reading and membership checks
//! - Single and batch insertion
//! - Cleaning of stale entries

pub mod store;
