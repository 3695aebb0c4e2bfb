//! GitHub release asset installer
//!
//! Resolves a platform specific release asset from a package's
//! `package.json`, downloads it and unpacks it next to the package.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
