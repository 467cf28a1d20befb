// Database Access
// Connection helper and transactional statement execution

use anyhow::{Context, Result};
use log::warn;
use postgres::{Client, NoTls};

/// Connection parameters for the platform database.
#[derive(Debug, Clone)]
pub struct DbParams {
    /// Database name
    pub name: String,
    /// Database user, also the owner of the dumped tables
    pub user: String,
    /// Database password
    pub password: String,
    /// Host, defaults to localhost
    pub host: Option<String>,
    /// Port, defaults to 5432
    pub port: Option<u16>,
}

impl DbParams {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or("localhost")
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(5432)
    }
}

/// Open a blocking connection. Connection failures abort the operation,
/// unlike statement failures later on.
pub fn connect(params: &DbParams) -> Result<Client> {
    postgres::Config::new()
        .host(params.host())
        .port(params.port())
        .user(&params.user)
        .password(&params.password)
        .dbname(&params.name)
        .connect(NoTls)
        .with_context(|| {
            format!(
                "Failed to connect to database '{}' at {}:{}",
                params.name,
                params.host(),
                params.port()
            )
        })
}

/// Tables owned by `owner`, per pg_tables.
pub fn list_owned_tables(client: &mut Client, owner: &str) -> Result<Vec<String>, postgres::Error> {
    let rows = client.query(
        "SELECT tablename FROM pg_tables WHERE tableowner = $1",
        &[&owner],
    )?;
    Ok(rows.iter().map(|row| row.get(0)).collect())
}

/// Run statements inside one transaction. The first failing statement
/// rolls the whole transaction back; the error is logged, not propagated,
/// and a failed rollback is swallowed.
pub fn run_statements(client: &mut Client, statements: &[String]) {
    let result = (|| {
        let mut tx = client.transaction()?;
        for statement in statements {
            tx.batch_execute(statement)?;
        }
        tx.commit()
    })();
    if let Err(e) = result {
        warn!("Statement batch failed, transaction rolled back: {e}");
    }
}
