use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, IntoActiveModel, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

use crate::database::DbPool;
use crate::entities::{category_entity, favorite_entity, guide_entity, user_entity};
use crate::error::{AppError, AppResult};
use crate::models::{
    AdminGuideQuery, CatalogQuery, GuideDetailResponse, GuideListItem, GuideReadResponse,
    GuideUpsertFields, RoleSet, TogglePublishResponse, can_access, denial_reason,
    has_active_subscription,
};
use crate::services::{
    ACTION_DOWNLOAD_PDF, ACTION_READ_MAGAZINE, ActivityService, FileService, LogService,
    UploadedFile, load_role_set,
};
use crate::utils::{ensure_unique_slug, generate_slug};

const LOG_SOURCE: &str = "GuideService";

/// A guide row with the joined category and author names already resolved.
#[derive(Debug, FromQueryResult)]
pub(crate) struct GuideRow {
    id: i64,
    slug: String,
    title: String,
    summary: Option<String>,
    cover_image_path: String,
    category_id: Option<i64>,
    current_price: i64,
    old_price: Option<i64>,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    category_name: Option<String>,
    category_slug: Option<String>,
    created_by_full_name: Option<String>,
    created_by_email: Option<String>,
}

impl GuideRow {
    fn into_list_item(self, is_favorited: bool) -> GuideListItem {
        GuideListItem {
            id: self.id,
            slug: self.slug,
            title: self.title,
            summary: self.summary,
            cover_image_path: self.cover_image_path,
            category_id: self.category_id,
            category_name: self.category_name,
            category_slug: self.category_slug,
            current_price: self.current_price,
            old_price: self.old_price,
            is_free: self.current_price == 0,
            is_published: self.is_published,
            created_by_name: self
                .created_by_full_name
                .or(self.created_by_email)
                .unwrap_or_else(|| "Unknown".to_string()),
            created_at: self.created_at,
            is_favorited,
        }
    }
}

/// Magazine catalog, entitlement-gated reading and admin-side management.
#[derive(Clone)]
pub struct GuideService {
    pool: DbPool,
    file_service: FileService,
    activity_service: ActivityService,
    log_service: LogService,
}

impl GuideService {
    pub fn new(
        pool: DbPool,
        file_service: FileService,
        activity_service: ActivityService,
        log_service: LogService,
    ) -> Self {
        Self {
            pool,
            file_service,
            activity_service,
            log_service,
        }
    }

    fn select_with_names() -> Select<guide_entity::Entity> {
        guide_entity::Entity::find()
            .select_only()
            .columns([
                guide_entity::Column::Id,
                guide_entity::Column::Slug,
                guide_entity::Column::Title,
                guide_entity::Column::Summary,
                guide_entity::Column::CoverImagePath,
                guide_entity::Column::CategoryId,
                guide_entity::Column::CurrentPrice,
                guide_entity::Column::OldPrice,
                guide_entity::Column::IsPublished,
                guide_entity::Column::CreatedAt,
                guide_entity::Column::UpdatedAt,
            ])
            .column_as(category_entity::Column::Name, "category_name")
            .column_as(category_entity::Column::Slug, "category_slug")
            .column_as(user_entity::Column::FullName, "created_by_full_name")
            .column_as(user_entity::Column::Email, "created_by_email")
            .join(JoinType::LeftJoin, guide_entity::Relation::Category.def())
            .join(JoinType::LeftJoin, guide_entity::Relation::CreatedBy.def())
    }

    /// Published magazines for the catalog, newest first, with optional
    /// category and search filters.
    pub async fn list_published(
        &self,
        user_id: Option<i64>,
        query: &CatalogQuery,
    ) -> AppResult<Vec<GuideListItem>> {
        let mut select =
            Self::select_with_names().filter(guide_entity::Column::IsPublished.eq(true));

        if let Some(category) = query.category.as_deref() {
            let category = category.trim().to_lowercase();
            if !category.is_empty() && category != "all" {
                select = select.filter(category_entity::Column::Slug.eq(category));
            }
        }

        if let Some(search) = query.search.as_deref() {
            let search = search.trim();
            if !search.is_empty() {
                let pattern = format!("%{search}%");
                select = select.filter(
                    Condition::any()
                        .add(
                            Expr::col((guide_entity::Entity, guide_entity::Column::Title))
                                .ilike(pattern.clone()),
                        )
                        .add(
                            Expr::col((guide_entity::Entity, guide_entity::Column::Summary))
                                .ilike(pattern),
                        ),
                );
            }
        }

        let rows = select
            .order_by_desc(guide_entity::Column::CreatedAt)
            .into_model::<GuideRow>()
            .all(&self.pool)
            .await?;

        let favorited = match user_id {
            Some(user_id) => self.favorited_guide_ids(user_id).await?,
            None => HashSet::new(),
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let is_favorited = favorited.contains(&row.id);
                row.into_list_item(is_favorited)
            })
            .collect())
    }

    pub(crate) async fn favorited_guide_ids(&self, user_id: i64) -> AppResult<HashSet<i64>> {
        let ids: Vec<i64> = favorite_entity::Entity::find()
            .filter(favorite_entity::Column::UserId.eq(user_id))
            .select_only()
            .column(favorite_entity::Column::GuideId)
            .into_tuple()
            .all(&self.pool)
            .await?;

        Ok(ids.into_iter().collect())
    }

    pub async fn detail_by_slug(
        &self,
        slug: &str,
        user_id: Option<i64>,
    ) -> AppResult<GuideDetailResponse> {
        let guide = self.published_by_slug(slug).await?;

        let (can_read, is_favorited) = match user_id {
            Some(user_id) => {
                let (roles, has_active) = self.user_access_state(user_id).await?;
                let can_read = can_access(&roles, has_active, guide.current_price);
                let is_favorited = self.favorited_guide_ids(user_id).await?.contains(&guide.id);
                (can_read, is_favorited)
            }
            None => (guide.current_price == 0, false),
        };

        self.detail_response(guide.id, is_favorited, can_read).await
    }

    /// Serves the reading view of a published magazine, enforcing the access
    /// rules and recording the read in the activity trail.
    pub async fn read(
        &self,
        slug: &str,
        user_id: i64,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<GuideReadResponse> {
        let guide = self.published_by_slug(slug).await?;
        self.authorize_access(user_id, &guide).await?;

        self.activity_service
            .record_best_effort(
                user_id,
                ACTION_READ_MAGAZINE,
                Some(guide.id),
                ip_address,
                user_agent,
            )
            .await;

        Ok(GuideReadResponse {
            id: guide.id,
            slug: guide.slug,
            title: guide.title,
            pdf_path: guide.pdf_path,
        })
    }

    /// Resolves the on-disk PDF for download. Returns the path together with
    /// the `{slug}.pdf` filename the response should advertise.
    pub async fn download(
        &self,
        slug: &str,
        user_id: i64,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<(PathBuf, String)> {
        let guide = self.published_by_slug(slug).await?;
        self.authorize_access(user_id, &guide).await?;

        let path = self.file_service.full_path(&guide.pdf_path);
        if !path.is_file() {
            return Err(AppError::NotFound("PDF file not found".to_string()));
        }

        self.activity_service
            .record_best_effort(
                user_id,
                ACTION_DOWNLOAD_PDF,
                Some(guide.id),
                ip_address,
                user_agent,
            )
            .await;

        Ok((path, format!("{}.pdf", guide.slug)))
    }

    pub async fn admin_list(&self, query: &AdminGuideQuery) -> AppResult<Vec<GuideListItem>> {
        let mut select = Self::select_with_names();

        if let Some(category_id) = query.category_id {
            select = select.filter(guide_entity::Column::CategoryId.eq(category_id));
        }
        if let Some(published) = query.published {
            select = select.filter(guide_entity::Column::IsPublished.eq(published));
        }

        let rows = select
            .order_by_desc(guide_entity::Column::CreatedAt)
            .into_model::<GuideRow>()
            .all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.into_list_item(false)).collect())
    }

    pub async fn create(
        &self,
        fields: GuideUpsertFields,
        cover: UploadedFile,
        pdf: UploadedFile,
        created_by: i64,
    ) -> AppResult<GuideDetailResponse> {
        let title = fields.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }
        if fields.current_price < 0 {
            return Err(AppError::ValidationError(
                "Price must not be negative".to_string(),
            ));
        }

        // Validate both files before storing either, so a bad PDF does not
        // leave an orphaned cover on disk.
        FileService::validate_cover(&cover)?;
        FileService::validate_pdf(&pdf)?;

        let cover_path = self.file_service.save_cover(&cover).await?;
        let pdf_path = match self.file_service.save_pdf(&pdf).await {
            Ok(path) => path,
            Err(err) => {
                self.file_service.delete_file(&cover_path).await;
                return Err(err);
            }
        };

        let slug = ensure_unique_slug(&generate_slug(&title), |candidate| {
            self.slug_exists(candidate, None)
        })
        .await?;

        let guide = guide_entity::ActiveModel {
            slug: Set(slug),
            title: Set(title),
            summary: Set(fields.summary),
            cover_image_path: Set(cover_path),
            pdf_path: Set(pdf_path),
            category_id: Set(fields.category_id),
            current_price: Set(fields.current_price),
            old_price: Set(fields.old_price),
            is_published: Set(fields.is_published),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.log_service
            .log_info(
                &format!("Guide created: {} (ID: {})", guide.title, guide.id),
                Some(LOG_SOURCE),
            )
            .await?;

        self.detail_response(guide.id, false, true).await
    }

    pub async fn update(
        &self,
        id: i64,
        fields: GuideUpsertFields,
        cover: Option<UploadedFile>,
        pdf: Option<UploadedFile>,
    ) -> AppResult<GuideDetailResponse> {
        let guide = guide_entity::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Magazine not found".to_string()))?;

        let title = fields.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }
        if fields.current_price < 0 {
            return Err(AppError::ValidationError(
                "Price must not be negative".to_string(),
            ));
        }

        if let Some(cover) = cover.as_ref() {
            FileService::validate_cover(cover)?;
        }
        if let Some(pdf) = pdf.as_ref() {
            FileService::validate_pdf(pdf)?;
        }

        let current_slug = guide.slug.clone();
        let old_cover_path = guide.cover_image_path.clone();
        let old_pdf_path = guide.pdf_path.clone();
        let mut active = guide.into_active_model();

        if let Some(cover) = cover {
            let cover_path = self.file_service.save_cover(&cover).await?;
            self.file_service.delete_file(&old_cover_path).await;
            active.cover_image_path = Set(cover_path);
        }
        if let Some(pdf) = pdf {
            let pdf_path = self.file_service.save_pdf(&pdf).await?;
            self.file_service.delete_file(&old_pdf_path).await;
            active.pdf_path = Set(pdf_path);
        }

        // Re-slug only when the title change produces a different, free slug.
        let new_slug = generate_slug(&title);
        if new_slug != current_slug && !self.slug_exists(new_slug.clone(), Some(id)).await? {
            active.slug = Set(new_slug);
        }

        active.title = Set(title);
        active.summary = Set(fields.summary);
        active.category_id = Set(fields.category_id);
        active.current_price = Set(fields.current_price);
        active.old_price = Set(fields.old_price);
        active.is_published = Set(fields.is_published);
        active.updated_at = Set(Some(Utc::now()));

        let guide = active.update(&self.pool).await?;

        self.log_service
            .log_info(
                &format!("Guide updated: {} (ID: {})", guide.title, guide.id),
                Some(LOG_SOURCE),
            )
            .await?;

        self.detail_response(guide.id, false, true).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let guide = guide_entity::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Magazine not found".to_string()))?;

        self.file_service.delete_file(&guide.cover_image_path).await;
        self.file_service.delete_file(&guide.pdf_path).await;

        guide_entity::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;

        self.log_service
            .log_info(
                &format!("Guide deleted: {} (ID: {})", guide.title, guide.id),
                Some(LOG_SOURCE),
            )
            .await?;

        Ok(())
    }

    pub async fn toggle_publish(&self, id: i64) -> AppResult<TogglePublishResponse> {
        let guide = guide_entity::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Magazine not found".to_string()))?;

        let next = !guide.is_published;
        let mut active = guide.into_active_model();
        active.is_published = Set(next);
        active.updated_at = Set(Some(Utc::now()));
        let guide = active.update(&self.pool).await?;

        self.log_service
            .log_info(
                &format!(
                    "Guide {}: {} (ID: {})",
                    if guide.is_published {
                        "published"
                    } else {
                        "unpublished"
                    },
                    guide.title,
                    guide.id
                ),
                Some(LOG_SOURCE),
            )
            .await?;

        Ok(TogglePublishResponse {
            id: guide.id,
            is_published: guide.is_published,
        })
    }

    async fn published_by_slug(&self, slug: &str) -> AppResult<guide_entity::Model> {
        guide_entity::Entity::find()
            .filter(guide_entity::Column::Slug.eq(slug))
            .one(&self.pool)
            .await?
            .filter(|guide| guide.is_published)
            .ok_or_else(|| AppError::NotFound("Magazine not found".to_string()))
    }

    async fn user_access_state(&self, user_id: i64) -> AppResult<(RoleSet, bool)> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let roles = load_role_set(&self.pool, user.id).await?;
        let has_active = has_active_subscription(
            user.is_subscribed,
            user.subscription_end_date,
            Utc::now(),
        );

        Ok((roles, has_active))
    }

    async fn authorize_access(&self, user_id: i64, guide: &guide_entity::Model) -> AppResult<()> {
        let (roles, has_active) = self.user_access_state(user_id).await?;

        if let Some(reason) = denial_reason(&roles, has_active, guide.current_price) {
            self.log_service
                .log_warning(
                    &format!(
                        "Access denied for user {} on magazine {}",
                        user_id, guide.slug
                    ),
                    Some(LOG_SOURCE),
                )
                .await?;
            return Err(AppError::Forbidden(reason.message(guide.current_price)));
        }

        Ok(())
    }

    async fn detail_response(
        &self,
        id: i64,
        is_favorited: bool,
        can_access: bool,
    ) -> AppResult<GuideDetailResponse> {
        let row = Self::select_with_names()
            .filter(guide_entity::Column::Id.eq(id))
            .into_model::<GuideRow>()
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Magazine not found".to_string()))?;

        let updated_at = row.updated_at;
        Ok(GuideDetailResponse {
            guide: row.into_list_item(is_favorited),
            updated_at,
            can_access,
        })
    }

    async fn slug_exists(&self, slug: String, exclude_id: Option<i64>) -> AppResult<bool> {
        let mut select = guide_entity::Entity::find().filter(guide_entity::Column::Slug.eq(slug));
        if let Some(exclude_id) = exclude_id {
            select = select.filter(guide_entity::Column::Id.ne(exclude_id));
        }

        Ok(select.one(&self.pool).await?.is_some())
    }
}
