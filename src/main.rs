// Geo Backup
// Command line orchestration for database dumps, restores, and patches

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use geo_backup::config::{Config, ConfigOverrides};
use geo_backup::db::DbParams;
use geo_backup::operations::{copy_data_dir, DbMaintenance, DumpEngine, RestoreEngine};
use geo_backup::utilities::{confirm, md5_file_hash, TimeFilter};

#[derive(Parser)]
#[command(
    name = "geo-backup",
    version,
    about = "Backup and restore helper for a geospatial content management database"
)]
struct Cli {
    /// Use custom settings.ini configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    database: DatabaseArgs,

    #[command(flatten)]
    geoserver: GeoserverArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DatabaseArgs {
    /// Database name
    #[arg(long = "db-name", value_name = "NAME", global = true)]
    name: Option<String>,

    /// Database user
    #[arg(long = "db-user", value_name = "USER", global = true)]
    user: Option<String>,

    /// Database password
    #[arg(
        long = "db-pass",
        value_name = "PASSWORD",
        env = "PGPASSWORD",
        default_value = "",
        hide_env_values = true,
        global = true
    )]
    password: String,

    /// Database host, defaults to localhost
    #[arg(long = "db-host", value_name = "HOST", global = true)]
    host: Option<String>,

    /// Database port, defaults to 5432
    #[arg(long = "db-port", value_name = "PORT", global = true)]
    port: Option<u16>,
}

impl DatabaseArgs {
    fn params(&self) -> Result<DbParams> {
        Ok(DbParams {
            name: self
                .name
                .clone()
                .context("Missing required option --db-name")?,
            user: self
                .user
                .clone()
                .context("Missing required option --db-user")?,
            password: self.password.clone(),
            host: self.host.clone(),
            port: self.port,
        })
    }
}

#[derive(Args)]
struct GeoserverArgs {
    /// Geoserver data directory
    #[arg(long = "geoserver-data-dir", value_name = "DIR", global = true)]
    data_dir: Option<String>,

    /// Dump geoserver vector data
    #[arg(
        long = "dump-geoserver-vector-data",
        overrides_with = "no_vector_data",
        global = true
    )]
    vector_data: bool,

    /// Don't dump geoserver vector data
    #[arg(long = "no-geoserver-vector-data", global = true)]
    no_vector_data: bool,

    /// Dump geoserver raster data
    #[arg(
        long = "dump-geoserver-raster-data",
        overrides_with = "no_raster_data",
        global = true
    )]
    raster_data: bool,

    /// Don't dump geoserver raster data
    #[arg(long = "no-geoserver-raster-data", global = true)]
    no_raster_data: bool,
}

impl GeoserverArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            gs_data_dir: self.data_dir.clone(),
            gs_dump_vector_data: tri_state(self.vector_data, self.no_vector_data),
            gs_dump_raster_data: tri_state(self.raster_data, self.no_raster_data),
        }
    }
}

fn tri_state(set: bool, unset: bool) -> Option<bool> {
    if set {
        Some(true)
    } else if unset {
        Some(false)
    } else {
        None
    }
}

#[derive(Subcommand)]
enum Command {
    /// Dump every selected table into a target folder
    Dump {
        /// Folder receiving one dump file per table
        #[arg(value_name = "TARGET")]
        target: PathBuf,
    },

    /// Restore every dump file found in a source folder
    Restore {
        /// Folder holding the dump files
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Apply the fixed schema patches
    Patch {
        /// Also truncate the monitoring notification table
        #[arg(long)]
        truncate_monitoring: bool,
    },

    /// Delete rows left dangling by a restore
    Cleanup,

    /// Truncate every table owned by the database user
    Flush {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Copy the geoserver data directory applying the configured filters
    CopyData {
        /// Destination directory
        #[arg(value_name = "TARGET")]
        target: PathBuf,
    },

    /// Print the MD5 checksum of a backup file
    Checksum {
        /// File to hash
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Dump { target } => {
            let config = Config::load(cli.config.as_deref(), &cli.geoserver.overrides())?;
            if config.gs_dump_vector_data {
                DumpEngine::new(&config).dump(&cli.database.params()?, &target)?;
            } else {
                info!("Vector data dump is disabled, skipping");
            }
        }
        Command::Restore { source, yes } => {
            let config = Config::load(cli.config.as_deref(), &cli.geoserver.overrides())?;
            if !config.gs_dump_vector_data {
                info!("Vector data restore is disabled, skipping");
            } else if yes || confirm("Restore may overwrite existing data. Continue?", false)? {
                RestoreEngine::new(&config).restore(&cli.database.params()?, &source)?;
            }
        }
        Command::Patch {
            truncate_monitoring,
        } => {
            DbMaintenance::patch(&cli.database.params()?, truncate_monitoring)?;
        }
        Command::Cleanup => {
            DbMaintenance::cleanup(&cli.database.params()?)?;
        }
        Command::Flush { yes } => {
            if yes || confirm("Flush will truncate every owned table. Continue?", false)? {
                DbMaintenance::flush(&cli.database.params()?)?;
            }
        }
        Command::CopyData { target } => {
            let config = Config::load(cli.config.as_deref(), &cli.geoserver.overrides())?;
            let (operator, timestamp) = &config.gs_data_dt_filter;
            let filter = TimeFilter::new(operator.as_deref(), timestamp.as_deref())?;
            let mut excludes = config.gs_exclude_file_path.clone();
            if !config.gs_dump_raster_data {
                // Raster files live under the data directory's `data` subtree.
                excludes.push("data".to_string());
            }
            let stats = copy_data_dir(
                Path::new(&config.gs_data_dir),
                &target,
                &filter,
                &excludes,
            )?;
            info!(
                "Copied {} entries into {}, skipped {}",
                stats.copied,
                target.display(),
                stats.skipped
            );
        }
        Command::Checksum { file } => {
            println!("{}", md5_file_hash(&file)?);
        }
    }

    Ok(())
}
