use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::{authenticated_user, client_metadata, optional_user_id};
use crate::models::{CatalogQuery, GuideDetailResponse, GuideListItem, GuideReadResponse};
use crate::services::GuideService;

#[utoipa::path(
    get,
    path = "/guides",
    tag = "guides",
    params(
        ("category" = Option<String>, Query, description = "Category slug filter"),
        ("search" = Option<String>, Query, description = "Search in title and summary")
    ),
    responses(
        (status = 200, description = "Published magazines", body = [GuideListItem])
    )
)]
pub async fn list_guides(
    guide_service: web::Data<GuideService>,
    req: HttpRequest,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse> {
    let user_id = optional_user_id(&req);

    match guide_service.list_published(user_id, &query).await {
        Ok(guides) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": guides
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/guides/{slug}",
    tag = "guides",
    params(("slug" = String, Path, description = "Magazine slug")),
    responses(
        (status = 200, description = "Magazine detail", body = GuideDetailResponse),
        (status = 404, description = "Magazine not found")
    )
)]
pub async fn guide_detail(
    guide_service: web::Data<GuideService>,
    req: HttpRequest,
    slug: web::Path<String>,
) -> Result<HttpResponse> {
    let user_id = optional_user_id(&req);

    match guide_service.detail_by_slug(&slug, user_id).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": detail
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/guides/{slug}/read",
    tag = "guides",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Magazine slug")),
    responses(
        (status = 200, description = "Reading view", body = GuideReadResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Subscription required"),
        (status = 404, description = "Magazine not found")
    )
)]
pub async fn read_guide(
    guide_service: web::Data<GuideService>,
    req: HttpRequest,
    slug: web::Path<String>,
) -> Result<HttpResponse> {
    let user = authenticated_user(&req)?;
    let (ip_address, user_agent) = client_metadata(&req);

    match guide_service
        .read(&slug, user.id, ip_address, user_agent)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/guides/{slug}/download",
    tag = "guides",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "Magazine slug")),
    responses(
        (status = 200, description = "PDF file"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Subscription required"),
        (status = 404, description = "Magazine or PDF not found")
    )
)]
pub async fn download_guide(
    guide_service: web::Data<GuideService>,
    req: HttpRequest,
    slug: web::Path<String>,
) -> Result<HttpResponse> {
    let user = authenticated_user(&req)?;
    let (ip_address, user_agent) = client_metadata(&req);

    match guide_service
        .download(&slug, user.id, ip_address, user_agent)
        .await
    {
        Ok((path, file_name)) => {
            let file = NamedFile::open_async(path).await?;
            let response = file
                .set_content_disposition(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(file_name)],
                })
                .into_response(&req);
            Ok(response)
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn guide_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/guides")
            .route("", web::get().to(list_guides))
            .route("/{slug}", web::get().to(guide_detail))
            .route("/{slug}/read", web::get().to(read_guide))
            .route("/{slug}/download", web::get().to(download_guide)),
    );
}
