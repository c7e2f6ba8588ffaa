use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuideListItem {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub cover_image_path: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    /// Price in cents; 0 means free.
    pub current_price: i64,
    pub old_price: Option<i64>,
    pub is_free: bool,
    pub is_published: bool,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub is_favorited: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuideDetailResponse {
    #[serde(flatten)]
    pub guide: GuideListItem,
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether the requesting user may read/download this guide.
    pub can_access: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CatalogQuery {
    /// Category slug filter; absent or "all" means no filter.
    pub category: Option<String>,
    /// Case-insensitive search over title and summary.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminGuideQuery {
    pub category_id: Option<i64>,
    /// Publish-state filter; absent means all guides.
    pub published: Option<bool>,
}

/// Text fields of the multipart guide create/update forms. Files travel as
/// separate multipart parts and are validated by the file service.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GuideUpsertFields {
    #[schema(example = "Hunza Valley Travel Guide")]
    pub title: String,
    pub summary: Option<String>,
    pub category_id: Option<i64>,
    /// Price in cents; 0 publishes the guide as free content.
    #[schema(example = 500)]
    pub current_price: i64,
    pub old_price: Option<i64>,
    pub is_published: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuideReadResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub pdf_path: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TogglePublishResponse {
    pub id: i64,
    pub is_published: bool,
}
