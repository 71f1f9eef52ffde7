//! Core module - Path handling and error types shared by the cache store
//!
//! This module provides:
//! - Canonical path resolution and the cache file location
//! - Typed cache errors

pub mod error;
pub mod paths;
