use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::guide::list_guides,
        handlers::guide::guide_detail,
        handlers::guide::read_guide,
        handlers::guide::download_guide,
        handlers::category::list_categories,
        handlers::favorite::list_favorites,
        handlers::favorite::toggle_favorite,
        handlers::user::get_profile,
        handlers::user::update_profile,
        handlers::user::dashboard,
        handlers::admin::stats,
        handlers::admin::list_users,
        handlers::admin::create_employee,
        handlers::admin::delete_user,
        handlers::admin::activate_subscription,
        handlers::admin::expire_subscription,
        handlers::admin::user_activities,
        handlers::admin::recent_activities,
        handlers::admin::admin_list_guides,
        handlers::admin::create_guide,
        handlers::admin::update_guide,
        handlers::admin::delete_guide,
        handlers::admin::toggle_publish,
        handlers::admin::admin_list_categories,
        handlers::admin::create_category,
        handlers::admin::update_category,
        handlers::admin::delete_category,
        handlers::admin::list_logs,
        handlers::admin::prune_history,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            UpdateProfileRequest,
            UserResponse,
            AuthResponse,
            UserDashboardResponse,
            Role,
            GuideListItem,
            GuideDetailResponse,
            GuideReadResponse,
            GuideUpsertFields,
            TogglePublishResponse,
            CatalogQuery,
            AdminGuideQuery,
            CategoryResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            FavoriteActionResponse,
            AdminStatsResponse,
            AdminUserQuery,
            ActivateSubscriptionRequest,
            CreateEmployeeRequest,
            ActivityResponse,
            ActivityQuery,
            LogEntryResponse,
            LogQuery,
            PruneRequest,
            PruneResponse,
            ApiError,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "guides", description = "Magazine catalog and reading API"),
        (name = "categories", description = "Category API"),
        (name = "favorites", description = "Favorites API"),
        (name = "user", description = "Profile and dashboard API"),
        (name = "admin", description = "Administration API"),
    ),
    info(
        title = "Travelogue Backend API",
        version = "1.0.0",
        description = "Travelogue magazine subscription REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
