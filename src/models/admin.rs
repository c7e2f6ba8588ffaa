use crate::models::ActivityResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminStatsResponse {
    pub total_users: i64,
    pub subscribed_users: i64,
    pub unsubscribed_users: i64,
    pub employee_count: i64,
    pub total_guides: i64,
    pub published_guides: i64,
    pub free_guides: i64,
    pub paid_guides: i64,
    pub total_categories: i64,
    pub total_favorites: i64,
    pub recent_activities: Vec<ActivityResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminUserQuery {
    /// One of: all, subscribed, unsubscribed, employees.
    pub filter: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivateSubscriptionRequest {
    /// Monthly, Yearly or Lifetime.
    #[schema(example = "Monthly")]
    pub plan: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    #[schema(example = "editor@travelogue.pk")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    #[schema(example = "Bilal Ahmed")]
    pub full_name: String,
    /// Uploader or Admin.
    #[schema(example = "Uploader")]
    pub role: String,
}
