use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::database::Database;
use crate::models::ItemRequestResponse;
use crate::services::auth_service::Claims;
use crate::services::request_service::{self, ItemRequestPayload};
use crate::utils::error::AppResult;
use crate::utils::thread_pool::spawn_store_blocking;

#[utoipa::path(
    post,
    path = "/api/requests/add",
    tag = "Requests",
    request_body = ItemRequestPayload,
    responses(
        (status = 201, description = "Request created, pending approval", body = ItemRequestResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Receiver account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_request(
    db: web::Data<Database>,
    claims: web::ReqData<Claims>,
    body: web::Json<ItemRequestPayload>,
) -> AppResult<HttpResponse> {
    log::info!("🙏 POST /requests/add - receiver: {}", claims.sub);

    let db = db.get_ref().clone();
    let receiver_id = claims.sub.clone();
    let payload = body.into_inner();
    let request =
        spawn_store_blocking(move || request_service::create_request(&db, &receiver_id, &payload)).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Request posted successfully! It's pending admin approval.",
        "request": ItemRequestResponse::from(request)
    })))
}

#[utoipa::path(
    get,
    path = "/api/requests/my",
    tag = "Requests",
    responses(
        (status = 200, description = "Requests owned by the caller", body = [ItemRequestResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_requests(db: web::Data<Database>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    log::info!("📦 GET /requests/my - receiver: {}", claims.sub);

    let db = db.get_ref().clone();
    let receiver_id = claims.sub.clone();
    let requests =
        spawn_store_blocking(move || request_service::list_requests_by_receiver(&db, &receiver_id)).await?;

    let requests: Vec<ItemRequestResponse> = requests.into_iter().map(ItemRequestResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "requests": requests
    })))
}

#[utoipa::path(
    put,
    path = "/api/requests/{id}",
    tag = "Requests",
    params(("id" = String, Path, description = "Request ID")),
    request_body = ItemRequestPayload,
    responses(
        (status = 200, description = "Request updated", body = ItemRequestResponse),
        (status = 400, description = "Not pending or validation failed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_request(
    db: web::Data<Database>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    body: web::Json<ItemRequestPayload>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    log::info!("✏️ PUT /requests/{} - receiver: {}", id, claims.sub);

    let db = db.get_ref().clone();
    let receiver_id = claims.sub.clone();
    let payload = body.into_inner();
    let request =
        spawn_store_blocking(move || request_service::update_request(&db, &receiver_id, &id, &payload)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Request updated successfully.",
        "request": ItemRequestResponse::from(request)
    })))
}

#[utoipa::path(
    delete,
    path = "/api/requests/{id}",
    tag = "Requests",
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request deleted"),
        (status = 400, description = "Not pending"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_request(
    db: web::Data<Database>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    log::info!("🗑️ DELETE /requests/{} - receiver: {}", id, claims.sub);

    let db = db.get_ref().clone();
    let receiver_id = claims.sub.clone();
    spawn_store_blocking(move || request_service::delete_request(&db, &receiver_id, &id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Request deleted successfully."
    })))
}
