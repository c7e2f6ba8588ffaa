use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::database::DbPool;
use crate::entities::{category_entity, guide_entity};
use crate::error::{AppError, AppResult};
use crate::models::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::services::LogService;
use crate::utils::{ensure_unique_slug, generate_slug};

const LOG_SOURCE: &str = "CategoryService";

#[derive(Debug, FromQueryResult)]
struct CountRow {
    category_id: Option<i64>,
    count: i64,
}

/// Category CRUD plus the published-guide counts shown in listings.
#[derive(Clone)]
pub struct CategoryService {
    pool: DbPool,
    log_service: LogService,
}

impl CategoryService {
    pub fn new(pool: DbPool, log_service: LogService) -> Self {
        Self { pool, log_service }
    }

    /// Active categories in display order, for the public catalog.
    pub async fn list_active(&self) -> AppResult<Vec<CategoryResponse>> {
        let categories = category_entity::Entity::find()
            .filter(category_entity::Column::IsActive.eq(true))
            .order_by_asc(category_entity::Column::DisplayOrder)
            .order_by_asc(category_entity::Column::Name)
            .all(&self.pool)
            .await?;

        self.with_counts(categories).await
    }

    /// Every category including inactive ones, for the admin panel.
    pub async fn list_all(&self) -> AppResult<Vec<CategoryResponse>> {
        let categories = category_entity::Entity::find()
            .order_by_asc(category_entity::Column::DisplayOrder)
            .order_by_asc(category_entity::Column::Name)
            .all(&self.pool)
            .await?;

        self.with_counts(categories).await
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> AppResult<CategoryResponse> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Category name is required".to_string(),
            ));
        }

        let slug = ensure_unique_slug(&generate_slug(name), |candidate| {
            self.slug_exists(candidate, None)
        })
        .await?;

        let category = category_entity::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slug),
            description: Set(request.description),
            icon_class: Set(request.icon_class),
            is_active: Set(true),
            display_order: Set(request.display_order.unwrap_or(0)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.log_service
            .log_info(
                &format!("Category created: {}", category.name),
                Some(LOG_SOURCE),
            )
            .await?;

        Ok(CategoryResponse::from_model(category, 0))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateCategoryRequest,
    ) -> AppResult<CategoryResponse> {
        let category = category_entity::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let current_slug = category.slug.clone();
        let mut active = category.into_active_model();

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::ValidationError(
                    "Category name is required".to_string(),
                ));
            }

            // Re-slug only when the name change produces a different, free slug.
            let new_slug = generate_slug(&name);
            if new_slug != current_slug && !self.slug_exists(new_slug.clone(), Some(id)).await? {
                active.slug = Set(new_slug);
            }
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(icon_class) = request.icon_class {
            active.icon_class = Set(Some(icon_class));
        }
        if let Some(display_order) = request.display_order {
            active.display_order = Set(display_order);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }

        let category = active.update(&self.pool).await?;

        let counts = self.published_counts().await?;
        let guide_count = counts.get(&category.id).copied().unwrap_or(0);
        Ok(CategoryResponse::from_model(category, guide_count))
    }

    /// Deletes a category. Guides keep existing with their category cleared by
    /// the foreign key's SET NULL action.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let category = category_entity::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        category_entity::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;

        self.log_service
            .log_info(
                &format!("Category deleted: {}", category.name),
                Some(LOG_SOURCE),
            )
            .await?;

        Ok(())
    }

    async fn with_counts(
        &self,
        categories: Vec<category_entity::Model>,
    ) -> AppResult<Vec<CategoryResponse>> {
        let counts = self.published_counts().await?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let guide_count = counts.get(&category.id).copied().unwrap_or(0);
                CategoryResponse::from_model(category, guide_count)
            })
            .collect())
    }

    async fn published_counts(&self) -> AppResult<HashMap<i64, i64>> {
        let rows = guide_entity::Entity::find()
            .select_only()
            .column(guide_entity::Column::CategoryId)
            .column_as(Expr::val(1).count(), "count")
            .filter(guide_entity::Column::IsPublished.eq(true))
            .group_by(guide_entity::Column::CategoryId)
            .into_model::<CountRow>()
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.category_id.map(|id| (id, row.count)))
            .collect())
    }

    async fn slug_exists(&self, slug: String, exclude_id: Option<i64>) -> AppResult<bool> {
        let mut select =
            category_entity::Entity::find().filter(category_entity::Column::Slug.eq(slug));
        if let Some(exclude_id) = exclude_id {
            select = select.filter(category_entity::Column::Id.ne(exclude_id));
        }

        Ok(select.one(&self.pool).await?.is_some())
    }
}
