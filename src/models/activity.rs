use crate::entities::{log_entry_entity, user_activity_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponse {
    pub id: i64,
    pub user_id: i64,
    /// Full name of the acting user, falling back to their email.
    pub user_name: Option<String>,
    pub action: String,
    pub guide_id: Option<i64>,
    pub guide_title: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user_activity_entity::Model> for ActivityResponse {
    fn from(activity: user_activity_entity::Model) -> Self {
        Self {
            id: activity.id,
            user_id: activity.user_id,
            user_name: None,
            action: activity.action,
            guide_id: activity.guide_id,
            guide_title: None,
            ip_address: activity.ip_address,
            user_agent: activity.user_agent,
            created_at: activity.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogEntryResponse {
    pub id: i64,
    pub level: String,
    pub message: String,
    pub exception: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<log_entry_entity::Model> for LogEntryResponse {
    fn from(entry: log_entry_entity::Model) -> Self {
        Self {
            id: entry.id,
            level: entry.level,
            message: entry.message,
            exception: entry.exception,
            source: entry.source,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LogQuery {
    /// Filter by level: Info, Warning or Error.
    pub level: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivityQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PruneRequest {
    /// Entries older than this many days are deleted.
    #[schema(example = 30)]
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PruneResponse {
    pub activities_removed: u64,
    pub log_entries_removed: u64,
}
