use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::{require_admin, require_staff, require_super_admin};
use crate::models::{
    ActivateSubscriptionRequest, ActivityQuery, ActivityResponse, AdminGuideQuery,
    AdminStatsResponse, AdminUserQuery, CategoryResponse, CreateCategoryRequest,
    CreateEmployeeRequest, GuideListItem, GuideUpsertFields, LogEntryResponse, LogQuery,
    PruneRequest, PruneResponse, TogglePublishResponse, UpdateCategoryRequest, UserResponse,
};
use crate::services::{
    AdminService, CategoryService, GuideService, LogService, UploadedFile,
};

#[derive(MultipartForm)]
pub struct GuideCreateForm {
    pub title: Text<String>,
    pub summary: Option<Text<String>>,
    pub category_id: Option<Text<i64>>,
    pub current_price: Text<i64>,
    pub old_price: Option<Text<i64>>,
    pub is_published: Option<Text<bool>>,
    pub cover: Bytes,
    pub pdf: Bytes,
}

#[derive(MultipartForm)]
pub struct GuideUpdateForm {
    pub title: Text<String>,
    pub summary: Option<Text<String>>,
    pub category_id: Option<Text<i64>>,
    pub current_price: Text<i64>,
    pub old_price: Option<Text<i64>>,
    pub is_published: Option<Text<bool>>,
    pub cover: Option<Bytes>,
    pub pdf: Option<Bytes>,
}

fn uploaded_file(file: Bytes) -> UploadedFile {
    UploadedFile {
        file_name: file.file_name.unwrap_or_default(),
        content_type: file.content_type.map(|ct| ct.to_string()),
        data: file.data.to_vec(),
    }
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = AdminStatsResponse),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn stats(admin_service: web::Data<AdminService>, req: HttpRequest) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("filter" = Option<String>, Query, description = "all, subscribed, unsubscribed or employees"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Users page"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    query: web::Query<AdminUserQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.list_users(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users/employees",
    tag = "admin",
    request_body = CreateEmployeeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Employee account created", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_employee(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    request: web::Json<CreateEmployeeRequest>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.create_employee(request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "SuperAdmin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    require_super_admin(&req)?;

    match admin_service.delete_user(*id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "User deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users/{id}/subscription",
    tag = "admin",
    request_body = ActivateSubscriptionRequest,
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Subscription activated", body = UserResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn activate_subscription(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<ActivateSubscriptionRequest>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.activate_subscription(*id, &request.plan).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/users/{id}/subscription",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Subscription expired", body = UserResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn expire_subscription(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.expire_subscription(*id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users/{id}/activities",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User id"),
        ("limit" = Option<u64>, Query, description = "Maximum rows")
    ),
    responses(
        (status = 200, description = "User activity trail", body = [ActivityResponse]),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_activities(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    id: web::Path<i64>,
    query: web::Query<ActivityQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.user_activities(*id, query.limit).await {
        Ok(activities) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": activities
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/activities",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("limit" = Option<u64>, Query, description = "Maximum rows")),
    responses(
        (status = 200, description = "Recent activity trail", body = [ActivityResponse]),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn recent_activities(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    query: web::Query<ActivityQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.activities(query.limit).await {
        Ok(activities) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": activities
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/guides",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("category_id" = Option<i64>, Query, description = "Category filter"),
        ("published" = Option<bool>, Query, description = "Publish-state filter")
    ),
    responses(
        (status = 200, description = "All magazines including unpublished", body = [GuideListItem]),
        (status = 403, description = "Staff role required")
    )
)]
pub async fn admin_list_guides(
    guide_service: web::Data<GuideService>,
    req: HttpRequest,
    query: web::Query<AdminGuideQuery>,
) -> Result<HttpResponse> {
    require_staff(&req)?;

    match guide_service.admin_list(&query).await {
        Ok(guides) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": guides
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/guides",
    tag = "admin",
    request_body(content = GuideUpsertFields, content_type = "multipart/form-data"),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Magazine created"),
        (status = 400, description = "Invalid fields or files"),
        (status = 403, description = "Staff role required")
    )
)]
pub async fn create_guide(
    guide_service: web::Data<GuideService>,
    req: HttpRequest,
    form: MultipartForm<GuideCreateForm>,
) -> Result<HttpResponse> {
    let user = require_staff(&req)?;

    let form = form.into_inner();
    let fields = GuideUpsertFields {
        title: form.title.into_inner(),
        summary: form.summary.map(|t| t.into_inner()),
        category_id: form.category_id.map(|t| t.into_inner()),
        current_price: form.current_price.into_inner(),
        old_price: form.old_price.map(|t| t.into_inner()),
        is_published: form.is_published.map(|t| t.into_inner()).unwrap_or(false),
    };
    let cover = uploaded_file(form.cover);
    let pdf = uploaded_file(form.pdf);

    match guide_service.create(fields, cover, pdf, user.id).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": detail
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/guides/{id}",
    tag = "admin",
    request_body(content = GuideUpsertFields, content_type = "multipart/form-data"),
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Magazine id")),
    responses(
        (status = 200, description = "Magazine updated"),
        (status = 400, description = "Invalid fields or files"),
        (status = 403, description = "Staff role required"),
        (status = 404, description = "Magazine not found")
    )
)]
pub async fn update_guide(
    guide_service: web::Data<GuideService>,
    req: HttpRequest,
    id: web::Path<i64>,
    form: MultipartForm<GuideUpdateForm>,
) -> Result<HttpResponse> {
    require_staff(&req)?;

    let form = form.into_inner();
    let fields = GuideUpsertFields {
        title: form.title.into_inner(),
        summary: form.summary.map(|t| t.into_inner()),
        category_id: form.category_id.map(|t| t.into_inner()),
        current_price: form.current_price.into_inner(),
        old_price: form.old_price.map(|t| t.into_inner()),
        is_published: form.is_published.map(|t| t.into_inner()).unwrap_or(false),
    };
    let cover = form.cover.map(uploaded_file);
    let pdf = form.pdf.map(uploaded_file);

    match guide_service.update(*id, fields, cover, pdf).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": detail
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/guides/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Magazine id")),
    responses(
        (status = 200, description = "Magazine deleted"),
        (status = 403, description = "Staff role required"),
        (status = 404, description = "Magazine not found")
    )
)]
pub async fn delete_guide(
    guide_service: web::Data<GuideService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    require_staff(&req)?;

    match guide_service.delete(*id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Magazine deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/guides/{id}/toggle-publish",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Magazine id")),
    responses(
        (status = 200, description = "Publish state toggled", body = TogglePublishResponse),
        (status = 403, description = "Staff role required"),
        (status = 404, description = "Magazine not found")
    )
)]
pub async fn toggle_publish(
    guide_service: web::Data<GuideService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    require_staff(&req)?;

    match guide_service.toggle_publish(*id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/categories",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All categories including inactive", body = [CategoryResponse]),
        (status = 403, description = "Staff role required")
    )
)]
pub async fn admin_list_categories(
    category_service: web::Data<CategoryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    require_staff(&req)?;

    match category_service.list_all().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": categories
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/categories",
    tag = "admin",
    request_body = CreateCategoryRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_category(
    category_service: web::Data<CategoryService>,
    req: HttpRequest,
    request: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match category_service.create(request.into_inner()).await {
        Ok(category) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": category
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    tag = "admin",
    request_body = UpdateCategoryRequest,
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    category_service: web::Data<CategoryService>,
    req: HttpRequest,
    id: web::Path<i64>,
    request: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match category_service.update(*id, request.into_inner()).await {
        Ok(category) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": category
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    category_service: web::Data<CategoryService>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match category_service.delete(*id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Category deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/logs",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("level" = Option<String>, Query, description = "Info, Warning or Error"),
        ("limit" = Option<u64>, Query, description = "Maximum rows")
    ),
    responses(
        (status = 200, description = "Application log entries", body = [LogEntryResponse]),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_logs(
    log_service: web::Data<LogService>,
    req: HttpRequest,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match log_service.get_logs(&query).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": entries
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/maintenance/prune",
    tag = "admin",
    request_body = PruneRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Old history removed", body = PruneResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn prune_history(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    request: web::Json<PruneRequest>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.prune_history(request.days).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/stats", web::get().to(stats))
            .route("/users", web::get().to(list_users))
            .route("/users/employees", web::post().to(create_employee))
            .route("/users/{id}", web::delete().to(delete_user))
            .route("/users/{id}/subscription", web::post().to(activate_subscription))
            .route("/users/{id}/subscription", web::delete().to(expire_subscription))
            .route("/users/{id}/activities", web::get().to(user_activities))
            .route("/activities", web::get().to(recent_activities))
            .route("/guides", web::get().to(admin_list_guides))
            .route("/guides", web::post().to(create_guide))
            .route("/guides/{id}", web::put().to(update_guide))
            .route("/guides/{id}", web::delete().to(delete_guide))
            .route("/guides/{id}/toggle-publish", web::post().to(toggle_publish))
            .route("/categories", web::get().to(admin_list_categories))
            .route("/categories", web::post().to(create_category))
            .route("/categories/{id}", web::put().to(update_category))
            .route("/categories/{id}", web::delete().to(delete_category))
            .route("/logs", web::get().to(list_logs))
            .route("/maintenance/prune", web::post().to(prune_history)),
    );
}
