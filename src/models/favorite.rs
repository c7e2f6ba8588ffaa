use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteActionResponse {
    pub guide_id: i64,
    pub is_favorited: bool,
    pub message: String,
}
