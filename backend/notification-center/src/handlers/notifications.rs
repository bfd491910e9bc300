/// Notification HTTP handlers
///
/// Thin layer over the notification center: extracts the bearer token,
/// delegates, and wraps results. Authorization outcomes surface as 403/404
/// through `AppError`; an absent token is not an HTTP error for reads.
use crate::error::AppError;
use crate::services::NotificationCenter;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Bearer token from the Authorization header, if any
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// List the caller's notifications
///
/// GET /api/v1/notifications
pub async fn list_notifications(
    center: web::Data<Arc<NotificationCenter>>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let notifications = center.list(bearer_token(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(notifications)))
}

/// Unread count for the caller's badge
///
/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    center: web::Data<Arc<NotificationCenter>>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let unread = center.unread_count(bearer_token(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "unread": unread }))))
}

/// Mark every in-scope notification as read
///
/// PUT /api/v1/notifications/read-all
pub async fn mark_all_read(
    center: web::Data<Arc<NotificationCenter>>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let updated = center.mark_all_read(bearer_token(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "updated": updated }))))
}

/// Delete one notification
///
/// DELETE /api/v1/notifications/{id}
pub async fn delete_notification(
    center: web::Data<Arc<NotificationCenter>>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    center.delete_notification(bearer_token(&req), id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "deleted": true }))))
}

/// Register routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .route("", web::get().to(list_notifications))
            .route("/unread-count", web::get().to(unread_count))
            .route("/read-all", web::put().to(mark_all_read))
            .route("/{id}", web::delete().to(delete_notification)),
    );
}
