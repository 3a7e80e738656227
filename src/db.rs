use std::str::FromStr;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::info;

use crate::models::{seed_activities, Activity, ActivityRow};
use crate::participants::join_participants;

const SQL_CREATE_ACTIVITIES: &str = r#"
CREATE TABLE IF NOT EXISTS activities (
  id INTEGER PRIMARY KEY,
  name VARCHAR(200) NOT NULL UNIQUE,
  description TEXT,
  schedule VARCHAR(200),
  max_participants INTEGER,
  participants TEXT DEFAULT '',
  created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
  updated_at DATETIME
)
"#;

const SQL_LIST_ACTIVITIES: &str = r#"
SELECT id, name, description, schedule, max_participants, participants, created_at, updated_at
FROM activities
ORDER BY id ASC
"#;

const SQL_FIND_ACTIVITY: &str = r#"
SELECT id, name, description, schedule, max_participants, participants, created_at, updated_at
FROM activities
WHERE name = ?
LIMIT 1
"#;

const SQL_UPDATE_PARTICIPANTS: &str = r#"
UPDATE activities
SET participants = ?, updated_at = CURRENT_TIMESTAMP
WHERE id = ?
"#;

const SQL_INSERT_ACTIVITY: &str = r#"
INSERT INTO activities (name, description, schedule, max_participants, participants)
VALUES (?, ?, ?, ?, ?)
"#;

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Build a pool that opens connections on first use, so an unreachable
    /// store shows up per request instead of at startup.
    pub fn connect_lazy(url: &str) -> sqlx::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_lazy_with(options);
        Ok(Self::new(pool))
    }

    /// Acquire one connection for the duration of a request. It goes back to
    /// the pool when dropped.
    pub async fn acquire(&self) -> sqlx::Result<PoolConnection<Sqlite>> {
        self.pool.acquire().await
    }

    pub async fn init_schema(&self) -> sqlx::Result<()> {
        sqlx::query(SQL_CREATE_ACTIVITIES)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn count_activities(&self) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities")
            .fetch_one(&self.pool)
            .await
    }

    /// Insert the seed activities when the table is empty. Returns whether
    /// anything was inserted.
    pub async fn seed_if_empty(&self) -> sqlx::Result<bool> {
        let mut tx = self.pool.begin().await?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            info!("Database already initialized with {} activities", count);
            return Ok(false);
        }

        for (name, activity) in seed_activities() {
            insert_activity(&mut *tx, &name, &activity).await?;
        }
        tx.commit().await?;
        info!("Seeded initial activities");
        Ok(true)
    }
}

pub async fn list_activities(conn: &mut SqliteConnection) -> sqlx::Result<Vec<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(SQL_LIST_ACTIVITIES)
        .fetch_all(&mut *conn)
        .await
}

pub async fn find_activity(
    conn: &mut SqliteConnection,
    name: &str,
) -> sqlx::Result<Option<ActivityRow>> {
    sqlx::query_as::<_, ActivityRow>(SQL_FIND_ACTIVITY)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn update_participants(
    conn: &mut SqliteConnection,
    id: i64,
    participants: &[String],
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_PARTICIPANTS)
        .bind(join_participants(participants))
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn insert_activity(
    conn: &mut SqliteConnection,
    name: &str,
    activity: &Activity,
) -> sqlx::Result<i64> {
    let res = sqlx::query(SQL_INSERT_ACTIVITY)
        .bind(name)
        .bind(activity.description.as_deref())
        .bind(activity.schedule.as_deref())
        .bind(activity.max_participants)
        .bind(join_participants(&activity.participants))
        .execute(&mut *conn)
        .await?;
    Ok(res.last_insert_rowid())
}

#[cfg(test)]
pub(crate) fn in_memory() -> Database {
    // One long-lived connection keeps the in-memory database alive.
    let options = SqliteConnectOptions::from_str("sqlite::memory:").expect("in-memory sqlite url");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_lazy_with(options);
    Database::new(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_without_schema_fails() {
        let db = in_memory();
        let mut conn = db.acquire().await.unwrap();
        assert!(list_activities(&mut conn).await.is_err());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = in_memory();
        db.init_schema().await.unwrap();
        assert!(db.seed_if_empty().await.unwrap());
        assert!(!db.seed_if_empty().await.unwrap());
        assert_eq!(db.count_activities().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_seed_skipped_when_any_row_exists() {
        let db = in_memory();
        db.init_schema().await.unwrap();
        let mut conn = db.acquire().await.unwrap();
        let act = Activity {
            description: None,
            schedule: None,
            max_participants: None,
            participants: vec![],
        };
        insert_activity(&mut conn, "Drama Club", &act).await.unwrap();
        drop(conn);

        assert!(!db.seed_if_empty().await.unwrap());
        assert_eq!(db.count_activities().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_and_update_participants() {
        let db = in_memory();
        db.init_schema().await.unwrap();
        db.seed_if_empty().await.unwrap();
        let mut conn = db.acquire().await.unwrap();

        let row = find_activity(&mut conn, "Chess Club").await.unwrap().unwrap();
        assert!(row.created_at.is_some());
        assert!(row.updated_at.is_none());
        assert_eq!(
            row.participants_list(),
            vec!["michael@mergington.edu", "daniel@mergington.edu"]
        );

        let mut participants = row.participants_list();
        participants.push("new@mergington.edu".to_string());
        assert_eq!(
            update_participants(&mut conn, row.id, &participants)
                .await
                .unwrap(),
            1
        );

        let row = find_activity(&mut conn, "Chess Club").await.unwrap().unwrap();
        assert_eq!(row.participants_list().len(), 3);
        assert!(row.updated_at.is_some());

        assert!(find_activity(&mut conn, "Nonexistent Club")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_name_is_unique() {
        let db = in_memory();
        db.init_schema().await.unwrap();
        db.seed_if_empty().await.unwrap();
        let mut conn = db.acquire().await.unwrap();
        let dup = seed_activities().remove(0);
        assert!(insert_activity(&mut conn, &dup.0, &dup.1).await.is_err());
    }
}
