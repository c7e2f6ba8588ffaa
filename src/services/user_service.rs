use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};

use crate::database::DbPool;
use crate::entities::user_entity;
use crate::error::{AppError, AppResult};
use crate::models::{
    CatalogQuery, UpdateProfileRequest, UserDashboardResponse, UserResponse, days_until_expiry,
    has_active_subscription,
};
use crate::services::{ActivityService, GuideService, load_role_set};

const RECOMMENDED_LIMIT: usize = 6;
const RECENTLY_ADDED_LIMIT: usize = 6;

/// Profile management and the reader dashboard.
#[derive(Clone)]
pub struct UserService {
    pool: DbPool,
    guide_service: GuideService,
    activity_service: ActivityService,
}

impl UserService {
    pub fn new(
        pool: DbPool,
        guide_service: GuideService,
        activity_service: ActivityService,
    ) -> Self {
        Self {
            pool,
            guide_service,
            activity_service,
        }
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let roles = load_role_set(&self.pool, user.id).await?;
        Ok(UserResponse::from_model(user, &roles, Utc::now()))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        if request.full_name.is_none() && request.phone.is_none() {
            return Err(AppError::ValidationError(
                "No fields to update".to_string(),
            ));
        }

        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut active = user.into_active_model();

        if let Some(full_name) = request.full_name {
            let full_name = full_name.trim().to_string();
            if full_name.chars().count() < 2 || full_name.chars().count() > 100 {
                return Err(AppError::ValidationError(
                    "Full name must be between 2 and 100 characters".to_string(),
                ));
            }
            active.full_name = Set(Some(full_name));
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone.trim().to_string()));
        }
        active.updated_at = Set(Some(Utc::now()));

        active.update(&self.pool).await?;

        self.get_profile(user_id).await
    }

    /// Assembles the reader's landing page: subscription status, favorites,
    /// picks they have not favorited yet and the newest arrivals.
    pub async fn dashboard(&self, user_id: i64) -> AppResult<UserDashboardResponse> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let query = CatalogQuery {
            category: None,
            search: None,
        };
        let all = self
            .guide_service
            .list_published(Some(user_id), &query)
            .await?;

        let favorites: Vec<_> = all.iter().filter(|g| g.is_favorited).cloned().collect();
        let recommended: Vec<_> = all
            .iter()
            .filter(|g| !g.is_favorited)
            .take(RECOMMENDED_LIMIT)
            .cloned()
            .collect();
        let recently_added: Vec<_> = all.iter().take(RECENTLY_ADDED_LIMIT).cloned().collect();

        let total_read = self.activity_service.distinct_guides_read(user_id).await?;

        let now = Utc::now();
        Ok(UserDashboardResponse {
            user_name: user.full_name.clone().unwrap_or_else(|| user.email.clone()),
            email: user.email,
            is_subscribed: user.is_subscribed,
            subscription_plan: user.subscription_plan,
            subscription_end_date: user.subscription_end_date,
            has_active_subscription: has_active_subscription(
                user.is_subscribed,
                user.subscription_end_date,
                now,
            ),
            days_until_expiry: days_until_expiry(
                user.is_subscribed,
                user.subscription_end_date,
                now,
            ),
            total_favorites: favorites.len() as i64,
            favorite_magazines: favorites,
            recommended_magazines: recommended,
            recently_added,
            total_read,
        })
    }
}
