//! Transaction-scoped serialization for validate-then-write sequences.
//!
//! On PostgreSQL these take `pg_advisory_xact_lock`, released automatically at
//! commit or rollback. Other backends are assumed to serialize writers on
//! their own (the SQLite test pool holds a single connection) and skip the
//! lock.

use models::days::DayOfWeek;
use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

const PREREQUISITE_GRAPH_KEY: &str = "course_prerequisites";

/// Serializes bookings of one room on one day
pub async fn lock_room_day<C>(conn: &C, room: &str, day: DayOfWeek) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    advisory_xact_lock(conn, room_day_key(room, day)).await
}

/// Serializes all prerequisite-edge insertions.
///
/// A cycle can be closed by two edges that share no endpoint, so locking only
/// the two courses of each insertion is not enough.
pub async fn lock_prerequisite_graph<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    advisory_xact_lock(conn, PREREQUISITE_GRAPH_KEY.to_string()).await
}

fn room_day_key(room: &str, day: DayOfWeek) -> String {
    format!("schedules:{}:{}", room.trim(), day)
}

async fn advisory_xact_lock<C>(conn: &C, key: String) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if conn.get_database_backend() != DbBackend::Postgres {
        return Ok(());
    }

    log::debug!("Acquiring advisory lock {key}");
    conn.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock(hashtextextended($1, 0))",
        [key.into()],
    ))
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{MockDatabase, MockExecResult, Transaction};

    fn lock_statement(key: &str) -> Transaction {
        Transaction::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT pg_advisory_xact_lock(hashtextextended($1, 0))",
            [key.into()],
        )
    }

    #[tokio::test]
    async fn test_postgres_takes_advisory_locks() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        lock_room_day(&db, " GHC 4102 ", DayOfWeek::Monday)
            .await
            .unwrap();
        lock_prerequisite_graph(&db).await.unwrap();

        assert_eq!(
            db.into_transaction_log(),
            vec![
                lock_statement("schedules:GHC 4102:monday"),
                lock_statement(PREREQUISITE_GRAPH_KEY),
            ]
        );
    }

    #[tokio::test]
    async fn test_other_backends_skip_the_lock() {
        let db = MockDatabase::new(DbBackend::Sqlite).into_connection();

        lock_room_day(&db, "GHC 4102", DayOfWeek::Friday)
            .await
            .unwrap();
        lock_prerequisite_graph(&db).await.unwrap();

        assert!(db.into_transaction_log().is_empty());
    }

    #[test]
    fn test_room_day_key_ignores_padding() {
        assert_eq!(
            room_day_key("  GHC 4102 ", DayOfWeek::Monday),
            room_day_key("GHC 4102", DayOfWeek::Monday)
        );
        assert_ne!(
            room_day_key("GHC 4102", DayOfWeek::Monday),
            room_day_key("GHC 4102", DayOfWeek::Tuesday)
        );
    }
}
