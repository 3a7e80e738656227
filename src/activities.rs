//! List, signup and unregister over the persistent store, with the in-memory
//! store taking over whenever the persistent path reports
//! [`StorageUnavailable`].

use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use crate::db::{self, Database};
use crate::error::{ClientError, StorageUnavailable, StoreError};
use crate::fallback::FallbackStore;
use crate::models::{ActivityMap, ActivityRow};

pub struct ActivityService {
    db: Database,
    fallback: FallbackStore,
}

impl ActivityService {
    pub fn new(db: Database, fallback: FallbackStore) -> Self {
        Self { db, fallback }
    }

    pub async fn list(&self) -> ActivityMap {
        match self.list_persistent().await {
            Ok(activities) => activities,
            Err(reason) => {
                warn!("Listing from fallback store: {}", reason);
                self.fallback.snapshot()
            }
        }
    }

    pub async fn signup(&self, activity_name: &str, email: &str) -> Result<String, ClientError> {
        match self.signup_persistent(activity_name, email).await {
            Ok(()) => {}
            Err(StoreError::Client(e)) => return Err(e),
            Err(StoreError::Unavailable(reason)) => {
                warn!("Signup for {} using fallback store: {}", activity_name, reason);
                self.fallback.signup(activity_name, email)?;
            }
        }
        info!("Signed up {} for {}", email, activity_name);
        Ok(format!("Signed up {email} for {activity_name}"))
    }

    pub async fn unregister(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<String, ClientError> {
        match self.unregister_persistent(activity_name, email).await {
            Ok(()) => {}
            Err(StoreError::Client(e)) => return Err(e),
            Err(StoreError::Unavailable(reason)) => {
                warn!(
                    "Unregister from {} using fallback store: {}",
                    activity_name, reason
                );
                self.fallback.unregister(activity_name, email)?;
            }
        }
        info!("Unregistered {} from {}", email, activity_name);
        Ok(format!("Unregistered {email} from {activity_name}"))
    }

    async fn list_persistent(&self) -> Result<ActivityMap, StorageUnavailable> {
        let mut conn = self.db.acquire().await?;
        let rows = db::list_activities(&mut conn).await?;
        if rows.is_empty() {
            return Err(StorageUnavailable::Empty);
        }
        Ok(rows
            .iter()
            .map(|row| (row.name.clone(), row.to_activity()))
            .collect())
    }

    async fn signup_persistent(&self, activity_name: &str, email: &str) -> Result<(), StoreError> {
        let mut conn = self.db.acquire().await?;
        let row = db::find_activity(&mut conn, activity_name)
            .await?
            .ok_or_else(|| StorageUnavailable::NotPersisted(activity_name.to_string()))?;
        debug!(
            "Loaded {} (created {:?}, last updated {:?})",
            row.name, row.created_at, row.updated_at
        );

        let mut participants = row.participants_list();
        if participants.iter().any(|p| p == email) {
            return Err(ClientError::AlreadySignedUp.into());
        }
        participants.push(email.to_string());
        persist_participants(&mut conn, &row, &participants).await
    }

    async fn unregister_persistent(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<(), StoreError> {
        let mut conn = self.db.acquire().await?;
        let row = db::find_activity(&mut conn, activity_name)
            .await?
            .ok_or_else(|| StorageUnavailable::NotPersisted(activity_name.to_string()))?;

        let mut participants = row.participants_list();
        let pos = participants
            .iter()
            .position(|p| p == email)
            .ok_or(ClientError::NotSignedUp)?;
        participants.remove(pos);
        persist_participants(&mut conn, &row, &participants).await
    }
}

/// Write the new roster back. A row that vanished since it was read counts
/// as not persisted, so the caller falls back instead of reporting success.
async fn persist_participants(
    conn: &mut SqliteConnection,
    row: &ActivityRow,
    participants: &[String],
) -> Result<(), StoreError> {
    if db::update_participants(conn, row.id, participants).await? == 0 {
        return Err(StorageUnavailable::NotPersisted(row.name.clone()).into());
    }
    Ok(())
}
