use anyhow::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};
use std::path::PathBuf;
use tokio::fs;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

const MIGRATIONS_DIR: &str = "migrations";

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<OrmConn> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Applies the `.sql` files in `migrations/` that have not run yet, in
/// filename order. Each file runs in its own transaction and is recorded in
/// `schema_migrations`. Returns how many files were applied.
pub async fn run_migrations(conn: &OrmConn) -> Result<usize> {
    let backend = conn.get_database_backend();
    conn.execute(Statement::from_string(
        backend,
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            filename TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ))
    .await?;

    let mut applied = 0;
    for file in migration_files().await? {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let seen = conn
            .query_one(Statement::from_sql_and_values(
                backend,
                "SELECT 1 FROM schema_migrations WHERE filename = $1",
                [name.clone().into()],
            ))
            .await?;
        if seen.is_some() {
            continue;
        }

        tracing::info!(file = %name, "applying migration");
        let sql = fs::read_to_string(&file).await?;
        let txn = conn.begin().await?;
        // Prepared statements cannot hold several commands.
        for stmt in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            txn.execute(Statement::from_string(backend, format!("{stmt};")))
                .await?;
        }
        txn.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO schema_migrations (filename) VALUES ($1) ON CONFLICT DO NOTHING",
            [name.into()],
        ))
        .await?;
        txn.commit().await?;
        applied += 1;
    }

    Ok(applied)
}

async fn migration_files() -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(MIGRATIONS_DIR).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Round-trips a trivial query; used by the health endpoint.
pub async fn ping(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
