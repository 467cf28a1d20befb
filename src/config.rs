// Configuration loading module
// INI settings file plus command line overrides

use ini::Ini;
use log::warn;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Mandatory option (-c / --config)")]
    MissingPath,
    #[error("Provided '-c' / '--config' file does not exist: {0}")]
    PathNotFound(String),
    #[error("Failed to read configuration: {0}")]
    Read(#[from] ini::Error),
    #[error("Missing required option [{section}] {option}")]
    MissingOption { section: String, option: String },
    #[error("Invalid boolean for [{section}] {option}: '{value}'")]
    InvalidBool {
        section: String,
        option: String,
        value: String,
    },
}

/// Settings for a backup or restore run.
///
/// Loaded from an INI file with `[database]`, `[geoserver]` and
/// `[fixtures]` sections; a handful of values can then be overridden from
/// the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the external dump tool
    pub pg_dump_cmd: String,

    /// Path of the external restore tool
    pub pg_restore_cmd: String,

    /// GeoServer data directory
    pub gs_data_dir: String,

    /// Glob patterns for data directory entries to leave out of a copy
    pub gs_exclude_file_path: Vec<String>,

    /// Dump vector data stored in the database
    pub gs_dump_vector_data: bool,

    /// Dump raster data stored in the data directory
    pub gs_dump_raster_data: bool,

    /// Modification-time window as (comparator, ISO timestamp)
    pub gs_data_dt_filter: (Option<String>, Option<String>),

    /// Layer name globs selecting tables to dump
    pub gs_data_layername_filter: Vec<String>,

    /// Layer name globs selecting tables to skip
    pub gs_data_layername_exclude_filter: Vec<String>,

    /// Application names whose fixtures take part in a run
    pub app_names: Vec<String>,

    /// Fixture dump names, parallel to `app_names`
    pub dump_names: Vec<String>,
}

/// Command line values that replace their settings-file counterparts.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub gs_data_dir: Option<String>,
    pub gs_dump_vector_data: Option<bool>,
    pub gs_dump_raster_data: Option<bool>,
}

impl Config {
    /// Load the settings file and apply command line overrides.
    ///
    /// A missing `-c/--config` option or a nonexistent path aborts the
    /// whole operation.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let path = path.ok_or(ConfigError::MissingPath)?;
        if !path.exists() {
            return Err(ConfigError::PathNotFound(path.display().to_string()));
        }
        let ini = Ini::load_from_file(path)?;
        let mut config = Self::from_ini(&ini)?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        Ok(Self {
            pg_dump_cmd: required(ini, "database", "pgdump")?.to_string(),
            pg_restore_cmd: required(ini, "database", "pgrestore")?.to_string(),
            gs_data_dir: required(ini, "geoserver", "datadir")?.to_string(),
            gs_exclude_file_path: optional(ini, "geoserver", "datadir_exclude_file_path")
                .map(split_list)
                .unwrap_or_default(),
            gs_dump_vector_data: required_bool(ini, "geoserver", "dumpvectordata")?,
            gs_dump_raster_data: required_bool(ini, "geoserver", "dumprasterdata")?,
            gs_data_dt_filter: optional(ini, "geoserver", "data_dt_filter")
                .map(parse_dt_filter)
                .unwrap_or((None, None)),
            gs_data_layername_filter: optional(ini, "geoserver", "data_layername_filter")
                .map(split_list)
                .unwrap_or_default(),
            gs_data_layername_exclude_filter: optional(
                ini,
                "geoserver",
                "data_layername_exclude_filter",
            )
            .map(split_list)
            .unwrap_or_default(),
            app_names: split_list(required(ini, "fixtures", "apps")?),
            dump_names: split_list(required(ini, "fixtures", "dumps")?),
        })
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(data_dir) = &overrides.gs_data_dir {
            self.gs_data_dir = data_dir.clone();
        }
        if let Some(vector) = overrides.gs_dump_vector_data {
            self.gs_dump_vector_data = vector;
        }
        if let Some(raster) = overrides.gs_dump_raster_data {
            self.gs_dump_raster_data = raster;
        }
    }
}

fn required<'a>(ini: &'a Ini, section: &str, option: &str) -> Result<&'a str, ConfigError> {
    optional(ini, section, option).ok_or_else(|| ConfigError::MissingOption {
        section: section.to_string(),
        option: option.to_string(),
    })
}

fn optional<'a>(ini: &'a Ini, section: &str, option: &str) -> Option<&'a str> {
    ini.section(Some(section))?.get(option)
}

fn required_bool(ini: &Ini, section: &str, option: &str) -> Result<bool, ConfigError> {
    let value = required(ini, section, option)?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            section: section.to_string(),
            option: option.to_string(),
            value: value.to_string(),
        }),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|item| item.to_string()).collect()
}

// "<comparator> <iso-timestamp>", e.g. "> 2019-04-05T00:00:00Z".
fn parse_dt_filter(value: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [operator, timestamp] => (
            Some(operator.to_string()),
            Some(timestamp.to_string()),
        ),
        _ => {
            warn!("Ignoring malformed data_dt_filter: '{value}'");
            (None, None)
        }
    }
}
