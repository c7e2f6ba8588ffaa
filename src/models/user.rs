use crate::entities::user_entity;
use crate::models::{GuideListItem, RoleSet, days_until_expiry, has_active_subscription};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "reader@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    #[schema(example = "Ayesha Khan")]
    pub full_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "reader@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "Ayesha Khan")]
    pub full_name: Option<String>,
    #[schema(example = "+923001234567")]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub is_subscribed: bool,
    pub subscription_plan: Option<String>,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub has_active_subscription: bool,
    pub days_until_expiry: i64,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_model(user: user_entity::Model, roles: &RoleSet, now: DateTime<Utc>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            roles: roles.names(),
            is_active: user.is_active,
            is_subscribed: user.is_subscribed,
            subscription_plan: user.subscription_plan,
            subscription_start_date: user.subscription_start_date,
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
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDashboardResponse {
    pub user_name: String,
    pub email: String,
    pub is_subscribed: bool,
    pub subscription_plan: Option<String>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub has_active_subscription: bool,
    pub days_until_expiry: i64,
    pub favorite_magazines: Vec<GuideListItem>,
    pub recommended_magazines: Vec<GuideListItem>,
    pub recently_added: Vec<GuideListItem>,
    pub total_favorites: i64,
    pub total_read: i64,
}
