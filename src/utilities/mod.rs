// Utilities module
// Glob matching, time filtering, hashing, and prompts

pub mod hash;
pub mod patterns;
pub mod prompt;
pub mod timefilter;

pub use hash::md5_file_hash;
pub use patterns::{glob_filter, glob_match, glob_to_regex};
pub use prompt::confirm;
pub use timefilter::{CmpOperator, TimeFilter};
