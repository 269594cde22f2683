mod repository;

pub use repository::*;

/// SQL migration for reference data and run log
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
