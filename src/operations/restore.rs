// Restore Engine
// Per-file database restores through the external restore tool

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::Config;
use crate::db::DbParams;

/// Extensions recognized as restorable dump files.
const DUMP_EXTENSIONS: &[&str] = &["dump", "sql"];

/// Feeds every dump file found in a folder to the configured restore
/// tool, one invocation per file.
pub struct RestoreEngine<'a> {
    config: &'a Config,
}

impl<'a> RestoreEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Restore every dump file in `source_folder` into the database.
    ///
    /// As with dumping, the restore tool's exit status is not inspected.
    pub fn restore(&self, params: &DbParams, source_folder: &Path) -> Result<()> {
        for file in dump_files(source_folder)? {
            let table = file
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();
            info!("Restoring vector data: {}:{}", params.name, table);
            let status = Command::new(&self.config.pg_restore_cmd)
                .env("PGPASSWORD", &params.password)
                .arg("-c")
                .arg("-h")
                .arg(params.host())
                .arg("-p")
                .arg(params.port().to_string())
                .arg("-U")
                .arg(&params.user)
                .arg(format!("--role={}", params.user))
                .args(["-F", "c"])
                .arg("-t")
                .arg(&table)
                .arg(&file)
                .arg("-d")
                .arg(&params.name)
                .status();
            if let Err(e) = status {
                warn!(
                    "Failed to launch restore tool '{}': {e}",
                    self.config.pg_restore_cmd
                );
            }
        }
        Ok(())
    }
}

/// Files in `folder` carrying a recognized dump extension, sorted by name
/// for a deterministic restore order.
fn dump_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read dump folder {}", folder.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let recognized = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| DUMP_EXTENSIONS.contains(&ext));
        if recognized {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_dump_files_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        for name in ["roads.dump", "rivers.sql", "notes.txt", "raw.dump.bak"] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("nested.dump")).unwrap();

        let files = dump_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["rivers.sql", "roads.dump"]);
    }

    #[test]
    fn test_dump_files_of_empty_folder() {
        let dir = TempDir::new().unwrap();
        assert!(dump_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        assert!(dump_files(Path::new("/no/such/folder")).is_err());
    }
}
