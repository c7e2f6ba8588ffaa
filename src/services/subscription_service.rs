use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};

use crate::database::DbPool;
use crate::entities::user_entity;
use crate::error::{AppError, AppResult};
use crate::models::{SubscriptionPlan, UserResponse};
use crate::services::load_role_set;

/// Applies subscription state transitions to user accounts.
#[derive(Clone)]
pub struct SubscriptionService {
    pool: DbPool,
}

impl SubscriptionService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Starts or extends a subscription. The new period always begins now,
    /// regardless of any remaining time on the previous one.
    pub async fn activate(&self, user_id: i64, plan_name: &str) -> AppResult<UserResponse> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let plan = SubscriptionPlan::parse(plan_name);
        let now = Utc::now();

        let mut active = user.into_active_model();
        active.is_subscribed = Set(true);
        active.subscription_plan = Set(Some(plan.as_str().to_string()));
        active.subscription_start_date = Set(Some(now));
        active.subscription_end_date = Set(Some(plan.end_date_from(now)));
        active.updated_at = Set(Some(now));
        let user = active.update(&self.pool).await?;

        let roles = load_role_set(&self.pool, user.id).await?;
        Ok(UserResponse::from_model(user, &roles, now))
    }

    /// Ends a subscription immediately. The plan name is retained so the
    /// account history remains visible.
    pub async fn expire(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let now = Utc::now();

        let mut active = user.into_active_model();
        active.is_subscribed = Set(false);
        active.subscription_end_date = Set(Some(now));
        active.updated_at = Set(Some(now));
        let user = active.update(&self.pool).await?;

        let roles = load_role_set(&self.pool, user.id).await?;
        Ok(UserResponse::from_model(user, &roles, now))
    }
}
