use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::config::SeedAdminConfig;
use crate::database::DbPool;
use crate::entities::{user_entity, user_role_entity};
use crate::error::AppResult;
use crate::models::Role;
use crate::utils::{hash_password, normalize_email};

/// Creates the configured super administrator account on first start, or
/// makes sure an existing account still holds the SuperAdmin role.
pub async fn seed_super_admin(pool: &DbPool, config: &SeedAdminConfig) -> AppResult<()> {
    if config.email.trim().is_empty() || config.password.is_empty() {
        log::warn!("Super admin credentials are not configured, skipping seed");
        return Ok(());
    }

    let email = normalize_email(&config.email);

    let existing = user_entity::Entity::find()
        .filter(user_entity::Column::Email.eq(email.clone()))
        .one(pool)
        .await?;

    let user_id = match existing {
        Some(user) => user.id,
        None => {
            let full_name = config
                .full_name
                .clone()
                .unwrap_or_else(|| "Super Administrator".to_string());

            let user = user_entity::ActiveModel {
                email: Set(email.clone()),
                password_hash: Set(hash_password(&config.password)?),
                full_name: Set(Some(full_name)),
                is_active: Set(true),
                is_subscribed: Set(false),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            let user = user.insert(pool).await?;
            log::info!("Super admin account created: {email}");
            user.id
        }
    };

    let has_role = user_role_entity::Entity::find()
        .filter(user_role_entity::Column::UserId.eq(user_id))
        .filter(user_role_entity::Column::Role.eq(Role::SuperAdmin.as_str()))
        .one(pool)
        .await?
        .is_some();

    if !has_role {
        user_role_entity::ActiveModel {
            user_id: Set(user_id),
            role: Set(Role::SuperAdmin.as_str().to_string()),
            ..Default::default()
        }
        .insert(pool)
        .await?;
    }

    Ok(())
}
