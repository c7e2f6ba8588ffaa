use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

use crate::database::DbPool;
use crate::entities::{guide_entity, user_activity_entity, user_entity};
use crate::error::AppResult;
use crate::models::ActivityResponse;

pub const ACTION_READ_MAGAZINE: &str = "Read Magazine";
pub const ACTION_DOWNLOAD_PDF: &str = "Download PDF";
pub const ACTION_USER_LOGIN: &str = "User Login";

#[derive(Debug, FromQueryResult)]
struct ActivityRow {
    id: i64,
    user_id: i64,
    action: String,
    guide_id: Option<i64>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: chrono::DateTime<Utc>,
    user_full_name: Option<String>,
    user_email: Option<String>,
    guide_title: Option<String>,
}

/// Records user actions for the audit trail and answers history queries.
#[derive(Clone)]
pub struct ActivityService {
    pool: DbPool,
}

impl ActivityService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        user_id: i64,
        action: &str,
        guide_id: Option<i64>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<()> {
        user_activity_entity::ActiveModel {
            user_id: Set(user_id),
            action: Set(action.to_string()),
            guide_id: Set(guide_id),
            ip_address: Set(ip_address),
            user_agent: Set(user_agent),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(())
    }

    /// Same as [`record`](Self::record) but never fails the caller: the audit
    /// trail must not break logins or page reads.
    pub async fn record_best_effort(
        &self,
        user_id: i64,
        action: &str,
        guide_id: Option<i64>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) {
        if let Err(err) = self
            .record(user_id, action, guide_id, ip_address, user_agent)
            .await
        {
            log::warn!("Failed to record activity '{action}' for user {user_id}: {err}");
        }
    }

    /// Returns the most recent activities, newest first, with the acting
    /// user's display name and the touched magazine's title resolved.
    pub async fn list(&self, user_id: Option<i64>, limit: u64) -> AppResult<Vec<ActivityResponse>> {
        let mut select = user_activity_entity::Entity::find()
            .select_only()
            .columns([
                user_activity_entity::Column::Id,
                user_activity_entity::Column::UserId,
                user_activity_entity::Column::Action,
                user_activity_entity::Column::GuideId,
                user_activity_entity::Column::IpAddress,
                user_activity_entity::Column::UserAgent,
                user_activity_entity::Column::CreatedAt,
            ])
            .column_as(user_entity::Column::FullName, "user_full_name")
            .column_as(user_entity::Column::Email, "user_email")
            .column_as(guide_entity::Column::Title, "guide_title")
            .join(JoinType::LeftJoin, user_activity_entity::Relation::User.def())
            .join(JoinType::LeftJoin, user_activity_entity::Relation::Guide.def());

        if let Some(user_id) = user_id {
            select = select.filter(user_activity_entity::Column::UserId.eq(user_id));
        }

        let rows = select
            .order_by_desc(user_activity_entity::Column::CreatedAt)
            .limit(limit)
            .into_model::<ActivityRow>()
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ActivityResponse {
                id: row.id,
                user_id: row.user_id,
                user_name: row.user_full_name.or(row.user_email),
                action: row.action,
                guide_id: row.guide_id,
                guide_title: row.guide_title,
                ip_address: row.ip_address,
                user_agent: row.user_agent,
                created_at: row.created_at,
            })
            .collect())
    }

    /// Counts how many distinct magazines the user has opened.
    pub async fn distinct_guides_read(&self, user_id: i64) -> AppResult<i64> {
        let guide_ids: Vec<Option<i64>> = user_activity_entity::Entity::find()
            .filter(user_activity_entity::Column::UserId.eq(user_id))
            .filter(user_activity_entity::Column::Action.eq(ACTION_READ_MAGAZINE))
            .select_only()
            .column(user_activity_entity::Column::GuideId)
            .distinct()
            .into_tuple()
            .all(&self.pool)
            .await?;

        Ok(guide_ids.into_iter().flatten().count() as i64)
    }

    /// Deletes activity rows older than `days` days and returns how many rows
    /// were removed.
    pub async fn prune_older_than(&self, days: i64) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(days);

        let result = user_activity_entity::Entity::delete_many()
            .filter(user_activity_entity::Column::CreatedAt.lt(cutoff))
            .exec(&self.pool)
            .await?;

        Ok(result.rows_affected)
    }
}
