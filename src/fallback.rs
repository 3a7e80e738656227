use std::sync::{Mutex, MutexGuard};

use crate::error::ClientError;
use crate::models::{seed_activities, ActivityMap};

/// In-memory activities used whenever the persistent store cannot serve a
/// request. Lives as long as its owner and is never written back.
pub struct FallbackStore {
    activities: Mutex<ActivityMap>,
}

impl FallbackStore {
    pub fn new(activities: ActivityMap) -> Self {
        Self {
            activities: Mutex::new(activities),
        }
    }

    /// Store pre-filled with the three seed activities.
    pub fn seeded() -> Self {
        Self::new(seed_activities().into_iter().collect())
    }

    fn lock(&self) -> MutexGuard<'_, ActivityMap> {
        self.activities.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> ActivityMap {
        self.lock().clone()
    }

    pub fn signup(&self, activity_name: &str, email: &str) -> Result<(), ClientError> {
        let mut activities = self.lock();
        let activity = activities
            .get_mut(activity_name)
            .ok_or(ClientError::ActivityNotFound)?;
        if activity.participants.iter().any(|p| p == email) {
            return Err(ClientError::AlreadySignedUp);
        }
        activity.participants.push(email.to_string());
        Ok(())
    }

    pub fn unregister(&self, activity_name: &str, email: &str) -> Result<(), ClientError> {
        let mut activities = self.lock();
        let activity = activities
            .get_mut(activity_name)
            .ok_or(ClientError::ActivityNotFound)?;
        let pos = activity
            .participants
            .iter()
            .position(|p| p == email)
            .ok_or(ClientError::NotSignedUp)?;
        activity.participants.remove(pos);
        Ok(())
    }
}
