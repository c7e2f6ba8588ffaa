use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::database::DbPool;
use crate::entities::{
    category_entity, favorite_entity, guide_entity, user_entity, user_role_entity,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActivityResponse, AdminStatsResponse, AdminUserQuery, CreateEmployeeRequest,
    PaginatedResponse, PaginationParams, PruneResponse, Role, RoleSet, SubscriptionPlan,
    UserResponse,
};
use crate::services::{
    ActivityService, DEFAULT_LOG_RETENTION_DAYS, LogService, SubscriptionService,
};
use crate::utils::{hash_password, normalize_email, validate_email, validate_password};

const LOG_SOURCE: &str = "AdminService";
const RECENT_ACTIVITY_LIMIT: u64 = 10;
const DEFAULT_USER_ACTIVITY_LIMIT: u64 = 50;

const STAFF_ROLE_NAMES: [&str; 3] = ["Uploader", "Admin", "SuperAdmin"];

/// Back-office operations: dashboard statistics, user management and
/// subscription overrides.
#[derive(Clone)]
pub struct AdminService {
    pool: DbPool,
    subscription_service: SubscriptionService,
    activity_service: ActivityService,
    log_service: LogService,
}

impl AdminService {
    pub fn new(
        pool: DbPool,
        subscription_service: SubscriptionService,
        activity_service: ActivityService,
        log_service: LogService,
    ) -> Self {
        Self {
            pool,
            subscription_service,
            activity_service,
            log_service,
        }
    }

    pub async fn stats(&self) -> AppResult<AdminStatsResponse> {
        let now = Utc::now();

        let total_users = user_entity::Entity::find().count(&self.pool).await? as i64;
        let subscribed_users = user_entity::Entity::find()
            .filter(user_entity::Column::IsSubscribed.eq(true))
            .filter(user_entity::Column::SubscriptionEndDate.gt(now))
            .count(&self.pool)
            .await? as i64;
        let employee_count = self.staff_user_ids().await?.len() as i64;

        let total_guides = guide_entity::Entity::find().count(&self.pool).await? as i64;
        let published_guides = guide_entity::Entity::find()
            .filter(guide_entity::Column::IsPublished.eq(true))
            .count(&self.pool)
            .await? as i64;
        let free_guides = guide_entity::Entity::find()
            .filter(guide_entity::Column::CurrentPrice.eq(0))
            .count(&self.pool)
            .await? as i64;

        let total_categories = category_entity::Entity::find().count(&self.pool).await? as i64;
        let total_favorites = favorite_entity::Entity::find().count(&self.pool).await? as i64;

        let recent_activities = self
            .activity_service
            .list(None, RECENT_ACTIVITY_LIMIT)
            .await?;

        Ok(AdminStatsResponse {
            total_users,
            subscribed_users,
            unsubscribed_users: total_users - subscribed_users,
            employee_count,
            total_guides,
            published_guides,
            free_guides,
            paid_guides: total_guides - free_guides,
            total_categories,
            total_favorites,
            recent_activities,
        })
    }

    pub async fn list_users(
        &self,
        query: &AdminUserQuery,
    ) -> AppResult<PaginatedResponse<UserResponse>> {
        let now = Utc::now();
        let mut select = user_entity::Entity::find();

        match query.filter.as_deref().unwrap_or("all") {
            "subscribed" => {
                select = select
                    .filter(user_entity::Column::IsSubscribed.eq(true))
                    .filter(user_entity::Column::SubscriptionEndDate.gt(now));
            }
            "unsubscribed" => {
                select = select.filter(
                    Condition::any()
                        .add(user_entity::Column::IsSubscribed.eq(false))
                        .add(user_entity::Column::SubscriptionEndDate.lte(now))
                        .add(user_entity::Column::SubscriptionEndDate.is_null()),
                );
            }
            "employees" => {
                select = select.filter(user_entity::Column::Id.is_in(self.staff_user_ids().await?));
            }
            _ => {}
        }

        let total = select.clone().count(&self.pool).await? as i64;

        let params = PaginationParams::new(query.page, query.page_size);
        let users = select
            .order_by_desc(user_entity::Column::CreatedAt)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        let mut role_sets = self
            .roles_for_users(users.iter().map(|u| u.id).collect())
            .await?;

        let data = users
            .into_iter()
            .map(|user| {
                let roles = role_sets.remove(&user.id).unwrap_or_default();
                UserResponse::from_model(user, &roles, now)
            })
            .collect();

        Ok(PaginatedResponse::new(
            data,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn activate_subscription(
        &self,
        user_id: i64,
        plan: &str,
    ) -> AppResult<UserResponse> {
        let user = self.subscription_service.activate(user_id, plan).await?;

        self.log_service
            .log_info(
                &format!(
                    "Subscription activated for user {} (plan: {})",
                    user.email,
                    user.subscription_plan.as_deref().unwrap_or("Monthly")
                ),
                Some(LOG_SOURCE),
            )
            .await?;

        Ok(user)
    }

    pub async fn expire_subscription(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = self.subscription_service.expire(user_id).await?;

        self.log_service
            .log_info(
                &format!("Subscription expired for user {}", user.email),
                Some(LOG_SOURCE),
            )
            .await?;

        Ok(user)
    }

    /// Creates a staff account. Employees receive a lifetime subscription so
    /// entitlement checks never get in their way.
    pub async fn create_employee(&self, request: CreateEmployeeRequest) -> AppResult<UserResponse> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let full_name = request.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::ValidationError(
                "Full name is required".to_string(),
            ));
        }

        let role = match Role::parse(&request.role) {
            Some(role @ (Role::Uploader | Role::Admin)) => role,
            _ => {
                return Err(AppError::ValidationError(
                    "Role must be Uploader or Admin".to_string(),
                ));
            }
        };

        let email = normalize_email(&request.email);
        let existing = user_entity::Entity::find()
            .filter(user_entity::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "Email is already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let user = user_entity::ActiveModel {
            email: Set(email.clone()),
            password_hash: Set(hash_password(&request.password)?),
            full_name: Set(Some(full_name.to_string())),
            is_active: Set(true),
            is_subscribed: Set(true),
            subscription_plan: Set(Some(SubscriptionPlan::Lifetime.as_str().to_string())),
            subscription_start_date: Set(Some(now)),
            subscription_end_date: Set(Some(SubscriptionPlan::Lifetime.end_date_from(now))),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        user_role_entity::ActiveModel {
            user_id: Set(user.id),
            role: Set(role.as_str().to_string()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.log_service
            .log_info(
                &format!("Employee created: {email} (role: {role})"),
                Some(LOG_SOURCE),
            )
            .await?;

        let roles = RoleSet::from_iter([role]);
        Ok(UserResponse::from_model(user, &roles, now))
    }

    /// Permanently removes a user account. Roles, favorites and activities go
    /// with it through the foreign keys' cascade actions.
    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user_entity::Entity::delete_by_id(user_id)
            .exec(&self.pool)
            .await?;

        self.log_service
            .log_info(&format!("User deleted: {}", user.email), Some(LOG_SOURCE))
            .await?;

        Ok(())
    }

    pub async fn activities(&self, limit: Option<u64>) -> AppResult<Vec<ActivityResponse>> {
        self.activity_service
            .list(None, limit.unwrap_or(DEFAULT_USER_ACTIVITY_LIMIT))
            .await
    }

    pub async fn user_activities(
        &self,
        user_id: i64,
        limit: Option<u64>,
    ) -> AppResult<Vec<ActivityResponse>> {
        user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.activity_service
            .list(Some(user_id), limit.unwrap_or(DEFAULT_USER_ACTIVITY_LIMIT))
            .await
    }

    /// Removes activity rows and log entries older than the given number of
    /// days.
    pub async fn prune_history(&self, days: Option<i64>) -> AppResult<PruneResponse> {
        let days = days.unwrap_or(DEFAULT_LOG_RETENTION_DAYS);
        if days <= 0 {
            return Err(AppError::ValidationError(
                "Days must be a positive number".to_string(),
            ));
        }

        let activities_removed = self.activity_service.prune_older_than(days).await?;
        let log_entries_removed = self.log_service.clear_old_logs(days).await?;

        self.log_service
            .log_info(
                &format!(
                    "History pruned: {activities_removed} activities, {log_entries_removed} log entries older than {days} days"
                ),
                Some(LOG_SOURCE),
            )
            .await?;

        Ok(PruneResponse {
            activities_removed,
            log_entries_removed,
        })
    }

    async fn staff_user_ids(&self) -> AppResult<Vec<i64>> {
        let ids: Vec<i64> = user_role_entity::Entity::find()
            .filter(user_role_entity::Column::Role.is_in(STAFF_ROLE_NAMES))
            .select_only()
            .column(user_role_entity::Column::UserId)
            .distinct()
            .into_tuple()
            .all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn roles_for_users(&self, user_ids: Vec<i64>) -> AppResult<HashMap<i64, RoleSet>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = user_role_entity::Entity::find()
            .filter(user_role_entity::Column::UserId.is_in(user_ids))
            .all(&self.pool)
            .await?;

        let mut sets: HashMap<i64, RoleSet> = HashMap::new();
        for row in rows {
            if let Some(role) = Role::parse(&row.role) {
                sets.entry(row.user_id).or_default().insert(role);
            }
        }

        Ok(sets)
    }
}
