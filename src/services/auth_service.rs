use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};

use crate::database::DbPool;
use crate::entities::{user_entity, user_role_entity};
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, Role, RoleSet, UserResponse};
use crate::services::{ACTION_USER_LOGIN, ActivityService, LogService, load_role_set};
use crate::utils::{
    JwtService, hash_password, normalize_email, validate_email, validate_password, verify_password,
};

const LOG_SOURCE: &str = "AuthService";

/// Registration, login and token refresh for the public API.
#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
    jwt_service: JwtService,
    activity_service: ActivityService,
    log_service: LogService,
}

impl AuthService {
    pub fn new(
        pool: DbPool,
        jwt_service: JwtService,
        activity_service: ActivityService,
        log_service: LogService,
    ) -> Self {
        Self {
            pool,
            jwt_service,
            activity_service,
            log_service,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let full_name = request.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::ValidationError(
                "Full name is required".to_string(),
            ));
        }

        let email = normalize_email(&request.email);

        let existing = user_entity::Entity::find()
            .filter(user_entity::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "Email is already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let user = user_entity::ActiveModel {
            email: Set(email.clone()),
            password_hash: Set(hash_password(&request.password)?),
            full_name: Set(Some(full_name.to_string())),
            is_active: Set(true),
            is_subscribed: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        user_role_entity::ActiveModel {
            user_id: Set(user.id),
            role: Set(Role::Customer.as_str().to_string()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.log_service
            .log_info(&format!("New user registered: {email}"), Some(LOG_SOURCE))
            .await?;

        let roles = RoleSet::from_iter([Role::Customer]);
        self.issue_tokens(user, roles)
    }

    pub async fn login(
        &self,
        request: LoginRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let user = user_entity::Entity::find()
            .filter(user_entity::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Invalid email or password".to_string(),
            ));
        }

        if !user.is_active {
            return Err(AppError::AuthError("Account is disabled".to_string()));
        }

        let mut active = user.into_active_model();
        active.last_login_at = Set(Some(Utc::now()));
        let user = active.update(&self.pool).await?;

        let roles = load_role_set(&self.pool, user.id).await?;

        self.activity_service
            .record_best_effort(user.id, ACTION_USER_LOGIN, None, ip_address, user_agent)
            .await;
        self.log_service
            .log_info(&format!("User logged in: {email}"), Some(LOG_SOURCE))
            .await?;

        self.issue_tokens(user, roles)
    }

    /// Exchanges a valid refresh token for a fresh access token. The refresh
    /// token itself is returned unchanged.
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.is_active {
            return Err(AppError::AuthError("Account is disabled".to_string()));
        }

        let roles = load_role_set(&self.pool, user.id).await?;
        let role_names = roles.names();

        let access_token = self
            .jwt_service
            .generate_access_token(user.id, &user.email, &role_names)?;

        Ok(AuthResponse {
            user: UserResponse::from_model(user, &roles, Utc::now()),
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    pub async fn current_user(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = user_entity::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let roles = load_role_set(&self.pool, user.id).await?;
        Ok(UserResponse::from_model(user, &roles, Utc::now()))
    }

    fn issue_tokens(&self, user: user_entity::Model, roles: RoleSet) -> AppResult<AuthResponse> {
        let role_names = roles.names();

        let access_token = self
            .jwt_service
            .generate_access_token(user.id, &user.email, &role_names)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.id, &user.email, &role_names)?;

        Ok(AuthResponse {
            user: UserResponse::from_model(user, &roles, Utc::now()),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
