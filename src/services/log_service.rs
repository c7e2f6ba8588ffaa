use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::database::DbPool;
use crate::entities::log_entry_entity;
use crate::error::AppResult;
use crate::models::{LogEntryResponse, LogQuery};

pub const DEFAULT_LOG_RETENTION_DAYS: i64 = 30;

const DEFAULT_LOG_LIMIT: u64 = 100;
const MAX_LOG_LIMIT: u64 = 1000;

/// Persists application events to the `log_entries` table so administrators
/// can inspect them without shell access to the host.
#[derive(Clone)]
pub struct LogService {
    pool: DbPool,
}

impl LogService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn write(
        &self,
        level: &str,
        message: &str,
        exception: Option<String>,
        source: Option<&str>,
    ) -> AppResult<()> {
        log_entry_entity::ActiveModel {
            level: Set(level.to_string()),
            message: Set(message.to_string()),
            exception: Set(exception),
            source: Set(source.map(|s| s.to_string())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn log_info(&self, message: &str, source: Option<&str>) -> AppResult<()> {
        self.write("Info", message, None, source).await
    }

    pub async fn log_warning(&self, message: &str, source: Option<&str>) -> AppResult<()> {
        self.write("Warning", message, None, source).await
    }

    pub async fn log_error(
        &self,
        message: &str,
        exception: Option<String>,
        source: Option<&str>,
    ) -> AppResult<()> {
        self.write("Error", message, exception, source).await
    }

    pub async fn get_logs(&self, query: &LogQuery) -> AppResult<Vec<LogEntryResponse>> {
        let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT).min(MAX_LOG_LIMIT);

        let mut select = log_entry_entity::Entity::find();

        if let Some(level) = query.level.as_deref() {
            let level = level.trim();
            if !level.is_empty() {
                select = select.filter(log_entry_entity::Column::Level.eq(level));
            }
        }

        let entries = select
            .order_by_desc(log_entry_entity::Column::CreatedAt)
            .limit(limit)
            .all(&self.pool)
            .await?;

        Ok(entries.into_iter().map(LogEntryResponse::from).collect())
    }

    /// Deletes log entries older than `days_to_keep` days and returns how many
    /// rows were removed.
    pub async fn clear_old_logs(&self, days_to_keep: i64) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(days_to_keep);

        let result = log_entry_entity::Entity::delete_many()
            .filter(log_entry_entity::Column::CreatedAt.lt(cutoff))
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected)
    }
}
