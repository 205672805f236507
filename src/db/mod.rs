pub mod migrations;
pub mod queries;

use anyhow::Context;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    register_functions(&conn).context("failed to register sql functions")?;
    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// `fold_case(text)`: Unicode lowercase. SQLite's own `LOWER` and `LIKE` only
/// fold ASCII, so guest-name search goes through this instead.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}
