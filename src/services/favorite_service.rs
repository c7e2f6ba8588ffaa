use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};

use crate::database::DbPool;
use crate::entities::{favorite_entity, guide_entity, user_entity};
use crate::error::{AppError, AppResult};
use crate::models::{CatalogQuery, FavoriteActionResponse, GuideListItem};
use crate::services::{GuideService, LogService};

const LOG_SOURCE: &str = "FavoriteService";

/// Per-user favorite magazines.
#[derive(Clone)]
pub struct FavoriteService {
    pool: DbPool,
    guide_service: GuideService,
    log_service: LogService,
}

impl FavoriteService {
    pub fn new(pool: DbPool, guide_service: GuideService, log_service: LogService) -> Self {
        Self {
            pool,
            guide_service,
            log_service,
        }
    }

    /// Adds the magazine to the user's favorites, or removes it if it is
    /// already favorited.
    pub async fn toggle(&self, user_id: i64, guide_id: i64) -> AppResult<FavoriteActionResponse> {
        let guide = guide_entity::Entity::find_by_id(guide_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Magazine not found".to_string()))?;

        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let existing = favorite_entity::Entity::find()
            .filter(favorite_entity::Column::UserId.eq(user_id))
            .filter(favorite_entity::Column::GuideId.eq(guide_id))
            .one(&self.pool)
            .await?;

        match existing {
            Some(favorite) => {
                favorite.delete(&self.pool).await?;

                self.log_service
                    .log_info(
                        &format!(
                            "User {} removed guide {} from favorites",
                            user.email, guide.title
                        ),
                        Some(LOG_SOURCE),
                    )
                    .await?;

                Ok(FavoriteActionResponse {
                    guide_id,
                    is_favorited: false,
                    message: "Removed from favorites".to_string(),
                })
            }
            None => {
                favorite_entity::ActiveModel {
                    user_id: Set(user_id),
                    guide_id: Set(guide_id),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?;

                self.log_service
                    .log_info(
                        &format!(
                            "User {} added guide {} to favorites",
                            user.email, guide.title
                        ),
                        Some(LOG_SOURCE),
                    )
                    .await?;

                Ok(FavoriteActionResponse {
                    guide_id,
                    is_favorited: true,
                    message: "Added to favorites".to_string(),
                })
            }
        }
    }

    /// The user's favorited magazines, restricted to published ones.
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<GuideListItem>> {
        let query = CatalogQuery {
            category: None,
            search: None,
        };
        let guides = self
            .guide_service
            .list_published(Some(user_id), &query)
            .await?;

        Ok(guides.into_iter().filter(|g| g.is_favorited).collect())
    }
}
