// Operations module
// Business logic for dump, restore, and schema maintenance

pub mod datadir;
pub mod dump;
pub mod patch;
pub mod restore;

pub use datadir::{copy_data_dir, CopyStats};
pub use dump::DumpEngine;
pub use patch::DbMaintenance;
pub use restore::RestoreEngine;
