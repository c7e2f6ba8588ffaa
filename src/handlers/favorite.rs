use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::authenticated_user;
use crate::models::{FavoriteActionResponse, GuideListItem};
use crate::services::FavoriteService;

#[utoipa::path(
    get,
    path = "/favorites",
    tag = "favorites",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorited magazines", body = [GuideListItem]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_favorites(
    favorite_service: web::Data<FavoriteService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = authenticated_user(&req)?;

    match favorite_service.list_for_user(user.id).await {
        Ok(guides) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": guides
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/favorites/{guide_id}/toggle",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(("guide_id" = i64, Path, description = "Magazine id")),
    responses(
        (status = 200, description = "Favorite toggled", body = FavoriteActionResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Magazine not found")
    )
)]
pub async fn toggle_favorite(
    favorite_service: web::Data<FavoriteService>,
    req: HttpRequest,
    guide_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = authenticated_user(&req)?;

    match favorite_service.toggle(user.id, *guide_id).await {
        Ok(response) => {
            let message = response.message.clone();
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": response,
                "message": message
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn favorite_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::get().to(list_favorites))
            .route("/{guide_id}/toggle", web::post().to(toggle_favorite)),
    );
}
