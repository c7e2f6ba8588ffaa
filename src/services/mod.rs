use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};

use crate::database::DbPool;
use crate::entities::user_role_entity;
use crate::error::AppResult;
use crate::models::RoleSet;

pub mod activity_service;
pub mod admin_service;
pub mod auth_service;
pub mod category_service;
pub mod favorite_service;
pub mod file_service;
pub mod guide_service;
pub mod log_service;
pub mod subscription_service;
pub mod user_service;

pub use activity_service::*;
pub use admin_service::*;
pub use auth_service::*;
pub use category_service::*;
pub use favorite_service::*;
pub use file_service::*;
pub use guide_service::*;
pub use log_service::*;
pub use subscription_service::*;
pub use user_service::*;

pub(crate) async fn load_role_set(pool: &DbPool, user_id: i64) -> AppResult<RoleSet> {
    let names: Vec<String> = user_role_entity::Entity::find()
        .filter(user_role_entity::Column::UserId.eq(user_id))
        .select_only()
        .column(user_role_entity::Column::Role)
        .into_tuple()
        .all(pool)
        .await?;

    Ok(RoleSet::from_names(names))
}
