use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::participants::parse_participants;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    pub static_dir: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_dir: "static".to_string(),
        }
    }
}

/// Public shape of an activity, keyed by name in listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Activity {
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub max_participants: Option<i64>,
    pub participants: Vec<String>,
}

/// Activities keyed by name, in seed or row-id order.
pub type ActivityMap = IndexMap<String, Activity>;

/// Row of the `activities` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub max_participants: Option<i64>,
    pub participants: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl ActivityRow {
    pub fn participants_list(&self) -> Vec<String> {
        parse_participants(self.participants.as_deref())
    }

    pub fn to_activity(&self) -> Activity {
        Activity {
            description: self.description.clone(),
            schedule: self.schedule.clone(),
            max_participants: self.max_participants,
            participants: self.participants_list(),
        }
    }
}

fn seed(
    description: &str,
    schedule: &str,
    max_participants: i64,
    participants: [&str; 2],
) -> Activity {
    Activity {
        description: Some(description.to_string()),
        schedule: Some(schedule.to_string()),
        max_participants: Some(max_participants),
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

/// The three activities every fresh deployment starts with.
pub fn seed_activities() -> Vec<(String, Activity)> {
    vec![
        (
            "Chess Club".to_string(),
            seed(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
                ["michael@mergington.edu", "daniel@mergington.edu"],
            ),
        ),
        (
            "Programming Class".to_string(),
            seed(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
                ["emma@mergington.edu", "sophia@mergington.edu"],
            ),
        ),
        (
            "Gym Class".to_string(),
            seed(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
                ["john@mergington.edu", "olivia@mergington.edu"],
            ),
        ),
    ]
}
