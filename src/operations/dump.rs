// Dump Engine
// Per-table database dumps through the external dump tool

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use log::{info, warn};

use crate::config::Config;
use crate::db::{self, DbParams};
use crate::utilities::patterns::glob_filter;

/// Dumps every selected table of the platform database into a folder,
/// one file per table, by invoking the configured dump tool.
pub struct DumpEngine<'a> {
    config: &'a Config,
}

impl<'a> DumpEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Dump the selected tables into `target_folder`.
    ///
    /// The dump tool's exit status is not inspected; tool failures surface
    /// only in its own output.
    pub fn dump(&self, params: &DbParams, target_folder: &Path) -> Result<()> {
        let mut client = db::connect(params)?;
        let all_tables = match db::list_owned_tables(&mut client, &params.user) {
            Ok(tables) => tables,
            Err(e) => {
                warn!("Failed to list tables owned by '{}': {e}", params.user);
                return Ok(());
            }
        };

        let tables = select_tables(
            &all_tables,
            &self.config.gs_data_layername_filter,
            &self.config.gs_data_layername_exclude_filter,
        );
        for table in tables {
            info!("Dumping vector data: {}:{}", params.name, table);
            let target = target_folder.join(format!("{table}.dump"));
            let status = Command::new(&self.config.pg_dump_cmd)
                .env("PGPASSWORD", &params.password)
                .arg("-h")
                .arg(params.host())
                .arg("-p")
                .arg(params.port().to_string())
                .arg("-U")
                .arg(&params.user)
                .args(["-F", "c", "-b"])
                .arg("-t")
                .arg(format!("\"{table}\""))
                .arg("-f")
                .arg(&target)
                .arg(&params.name)
                .status();
            if let Err(e) = status {
                warn!(
                    "Failed to launch dump tool '{}': {e}",
                    self.config.pg_dump_cmd
                );
            }
        }
        Ok(())
    }
}

/// Apply the layer-name include globs if any, else the exclude globs.
fn select_tables(all_tables: &[String], include: &[String], exclude: &[String]) -> Vec<String> {
    if !include.is_empty() {
        let mut selected = Vec::new();
        for pattern in include {
            selected.extend(glob_filter(all_tables, pattern));
        }
        selected
    } else if !exclude.is_empty() {
        let mut selected = all_tables.to_vec();
        for pattern in exclude {
            let excluded = glob_filter(all_tables, pattern);
            selected.retain(|table| !excluded.contains(table));
        }
        selected
    } else {
        all_tables.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_no_filters_selects_everything() {
        let all = tables(&["roads", "rivers", "auth_user"]);
        assert_eq!(select_tables(&all, &[], &[]), all);
    }

    #[test]
    fn test_include_filter_wins_over_exclude() {
        let all = tables(&["layer_roads", "layer_rivers", "auth_user"]);
        let include = tables(&["layer_*"]);
        let exclude = tables(&["layer_roads"]);
        assert_eq!(
            select_tables(&all, &include, &exclude),
            tables(&["layer_roads", "layer_rivers"])
        );
    }

    #[test]
    fn test_multiple_include_patterns_accumulate() {
        let all = tables(&["roads", "rivers", "auth_user", "auth_group"]);
        let include = tables(&["r*", "auth_user"]);
        assert_eq!(
            select_tables(&all, &include, &[]),
            tables(&["roads", "rivers", "auth_user"])
        );
    }

    #[test]
    fn test_exclude_filter_removes_matches() {
        let all = tables(&["roads", "rivers", "auth_user", "auth_group"]);
        let exclude = tables(&["auth_*"]);
        assert_eq!(
            select_tables(&all, &[], &exclude),
            tables(&["roads", "rivers"])
        );
    }

    #[test]
    fn test_exclude_filter_with_no_matches_keeps_everything() {
        let all = tables(&["roads", "rivers"]);
        let exclude = tables(&["monitoring_*"]);
        assert_eq!(select_tables(&all, &[], &exclude), all);
    }
}
