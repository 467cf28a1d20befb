// Schema Maintenance
// Fixed schema patches and cleanup applied around restore runs

use anyhow::Result;
use log::{info, warn};
use postgres::Client;

use crate::db::{self, DbParams};

/// Bookkeeping table for restored backups; never flushed.
const RESTORED_BACKUP_TABLE: &str = "br_restoredbackup";

/// Fixed schema patches and destructive maintenance on the platform
/// database. Statement failures are logged and tolerated; only the
/// connection itself is allowed to fail the operation.
pub struct DbMaintenance;

impl DbMaintenance {
    /// Relax NOT NULL constraints that would reject rows mid-restore,
    /// optionally truncating the monitoring notification table.
    pub fn patch(params: &DbParams, truncate_monitoring: bool) -> Result<()> {
        let mut client = db::connect(params)?;
        let mut statements = vec![
            "ALTER TABLE base_contactrole ALTER COLUMN resource_id DROP NOT NULL;".to_string(),
            "ALTER TABLE base_link ALTER COLUMN resource_id DROP NOT NULL;".to_string(),
        ];
        if truncate_monitoring {
            statements.push("TRUNCATE monitoring_notificationreceiver CASCADE;".to_string());
        }
        db::run_statements(&mut client, &statements);
        Ok(())
    }

    /// Remove rows left dangling by a restore.
    pub fn cleanup(params: &DbParams) -> Result<()> {
        let mut client = db::connect(params)?;
        let statements = vec![
            "DELETE FROM base_contactrole WHERE resource_id is NULL;".to_string(),
            "DELETE FROM base_link WHERE resource_id is NULL;".to_string(),
        ];
        db::run_statements(&mut client, &statements);
        Ok(())
    }

    /// Truncate every table owned by the connecting user.
    pub fn flush(params: &DbParams) -> Result<()> {
        let mut client = db::connect(params)?;
        if let Err(e) = flush_tables(&mut client, &params.user) {
            warn!("Database flush failed, transaction rolled back: {e}");
        }
        Ok(())
    }
}

fn flush_tables(client: &mut Client, owner: &str) -> Result<(), postgres::Error> {
    let mut tx = client.transaction()?;
    let rows = tx.query(
        "SELECT tablename FROM pg_tables WHERE tableowner = $1",
        &[&owner],
    )?;
    for row in &rows {
        let table: String = row.get(0);
        if table == RESTORED_BACKUP_TABLE {
            continue;
        }
        info!("Flushing data: {table}");
        tx.batch_execute(&format!("TRUNCATE {table} CASCADE;"))?;
    }
    tx.commit()
}
