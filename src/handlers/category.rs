use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::CategoryResponse;
use crate::services::CategoryService;

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Active categories with published-guide counts", body = [CategoryResponse])
    )
)]
pub async fn list_categories(
    category_service: web::Data<CategoryService>,
) -> Result<HttpResponse> {
    match category_service.list_active().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": categories
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn category_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/categories").route("", web::get().to(list_categories)));
}
