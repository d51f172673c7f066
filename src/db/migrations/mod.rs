use std::{fs, path::Path};

use sqlx::{Executor, PgPool};
use tracing::info;

const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/db/migrations/sql");

pub async fn run_migrations(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    // Get all SQL files from the directory
    let mut entries = fs::read_dir(MIGRATIONS_DIR)?
        .filter_map(Result::ok)
        .filter(|entry| {
            let path = entry.path();
            path.extension().map(|ext| ext == "sql").unwrap_or(false)
        })
        .map(|entry| entry.path())
        .collect::<Vec<_>>();

    // Numbered DDL files run first, index creation runs last
    entries.sort_by(|a, b| {
        let a_name = a.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let b_name = b.file_name().and_then(|n| n.to_str()).unwrap_or("");

        fn get_order_value(name: &str) -> usize {
            if name.starts_with("add_indexes") {
                return 1000;
            }
            name.split('_')
                .next()
                .and_then(|prefix| prefix.parse::<usize>().ok())
                .unwrap_or(usize::MAX)
        }

        get_order_value(a_name).cmp(&get_order_value(b_name))
    });

    for path in entries {
        execute_migration_file(pool, &path).await?;
        info!("Applied migration: {}", path.display());
    }

    Ok(())
}

async fn execute_migration_file(
    pool: &PgPool,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let sql = fs::read_to_string(path)?;
    pool.execute(sql.as_str()).await?;
    Ok(())
}
