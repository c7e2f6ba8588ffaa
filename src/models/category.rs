use crate::entities::category_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon_class: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    /// Published guides in this category.
    pub guide_count: i64,
    pub created_at: DateTime<Utc>,
}

impl CategoryResponse {
    pub fn from_model(category: category_entity::Model, guide_count: i64) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            icon_class: category.icon_class,
            is_active: category.is_active,
            display_order: category.display_order,
            guide_count,
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "Northern Areas")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "fa-mountain")]
    pub icon_class: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon_class: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}
