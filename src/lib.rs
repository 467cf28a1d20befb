// Geo Backup Library
// Backup and restore helpers for a geospatial content management database

// Configuration - INI settings plus command line overrides
pub mod config;

// Database access - connection helper and statement execution
pub mod db;

// Operations - dump, restore, and schema maintenance
pub mod operations;

// Utilities - glob matching, time filtering, hashing, prompts
pub mod utilities;

// Re-export commonly used items for convenience
pub use config::{Config, ConfigError, ConfigOverrides};
pub use db::DbParams;
pub use operations::{copy_data_dir, DbMaintenance, DumpEngine, RestoreEngine};
pub use utilities::{glob_filter, md5_file_hash, TimeFilter};
