use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::database::Database;
use crate::models::{Donation, ItemRequest, Match, MatchDetails};
use crate::services::matching_service::{self, CreateMatchRequest};
use crate::services::validation::ReviewAction;
use crate::services::{donation_service, request_service};
use crate::utils::error::AppResult;
use crate::utils::thread_pool::spawn_store_blocking;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReviewRequest {
    /// `approve` or `reject`
    pub action: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/admin/donations",
    tag = "Admin",
    responses((status = 200, description = "Every donation with donor details", body = [Donation])),
    security(("bearer_auth" = []))
)]
pub async fn list_donations(db: web::Data<Database>) -> AppResult<HttpResponse> {
    log::info!("📋 GET /admin/donations");

    let db = db.get_ref().clone();
    let donations = spawn_store_blocking(move || donation_service::list_all_donations(&db)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "donations": donations
    })))
}

#[utoipa::path(
    put,
    path = "/api/admin/donations/{id}/approve",
    tag = "Admin",
    params(("id" = String, Path, description = "Donation ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Donation approved or rejected"),
        (status = 400, description = "Invalid action or not pending"),
        (status = 404, description = "Donation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn review_donation(
    db: web::Data<Database>,
    path: web::Path<String>,
    body: web::Json<ReviewRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let action = ReviewAction::parse(body.action.as_deref())?;
    log::info!("🔎 PUT /admin/donations/{}/approve - action: {:?}", id, action);

    let db = db.get_ref().clone();
    spawn_store_blocking(move || donation_service::review_donation(&db, &id, action)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Donation {} successfully.", action.past_tense())
    })))
}

#[utoipa::path(
    get,
    path = "/api/admin/requests",
    tag = "Admin",
    responses((status = 200, description = "Every request with receiver details", body = [ItemRequest])),
    security(("bearer_auth" = []))
)]
pub async fn list_requests(db: web::Data<Database>) -> AppResult<HttpResponse> {
    log::info!("📋 GET /admin/requests");

    let db = db.get_ref().clone();
    let requests = spawn_store_blocking(move || request_service::list_all_requests(&db)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "requests": requests
    })))
}

#[utoipa::path(
    put,
    path = "/api/admin/requests/{id}/approve",
    tag = "Admin",
    params(("id" = String, Path, description = "Request ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Request approved or rejected"),
        (status = 400, description = "Invalid action or not pending"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn review_request(
    db: web::Data<Database>,
    path: web::Path<String>,
    body: web::Json<ReviewRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let action = ReviewAction::parse(body.action.as_deref())?;
    log::info!("🔎 PUT /admin/requests/{}/approve - action: {:?}", id, action);

    let db = db.get_ref().clone();
    spawn_store_blocking(move || request_service::review_request(&db, &id, action)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Request {} successfully.", action.past_tense())
    })))
}

#[utoipa::path(
    post,
    path = "/api/admin/match",
    tag = "Admin",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match created", body = Match),
        (status = 400, description = "Missing ids or items not matchable"),
        (status = 404, description = "Donation or request not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_match(db: web::Data<Database>, body: web::Json<CreateMatchRequest>) -> AppResult<HttpResponse> {
    log::info!(
        "🤝 POST /admin/match - donation: {:?}, request: {:?}",
        body.donation_id,
        body.request_id
    );

    let db = db.get_ref().clone();
    let body = body.into_inner();
    let record = spawn_store_blocking(move || matching_service::create_match(&db, &body)).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Donation and request matched successfully!",
        "match": record
    })))
}

#[utoipa::path(
    get,
    path = "/api/admin/matches",
    tag = "Admin",
    responses((status = 200, description = "Every match with item summaries", body = [MatchDetails])),
    security(("bearer_auth" = []))
)]
pub async fn list_matches(db: web::Data<Database>) -> AppResult<HttpResponse> {
    log::info!("📋 GET /admin/matches");

    let db = db.get_ref().clone();
    let matches = spawn_store_blocking(move || matching_service::list_matches(&db)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "matches": matches
    })))
}

#[utoipa::path(
    put,
    path = "/api/admin/matches/{id}/complete",
    tag = "Admin",
    params(("id" = String, Path, description = "Match ID")),
    responses(
        (status = 200, description = "Match completed", body = Match),
        (status = 400, description = "Match is not active"),
        (status = 404, description = "Match not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn complete_match(db: web::Data<Database>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    log::info!("🏁 PUT /admin/matches/{}/complete", id);

    let db = db.get_ref().clone();
    let record = spawn_store_blocking(move || matching_service::complete_match(&db, &id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Match completed successfully.",
        "match": record
    })))
}

#[utoipa::path(
    put,
    path = "/api/admin/matches/{id}/cancel",
    tag = "Admin",
    params(("id" = String, Path, description = "Match ID")),
    responses(
        (status = 200, description = "Match cancelled, items released", body = Match),
        (status = 400, description = "Match is not active"),
        (status = 404, description = "Match not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_match(db: web::Data<Database>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    log::info!("↩️ PUT /admin/matches/{}/cancel", id);

    let db = db.get_ref().clone();
    let record = spawn_store_blocking(move || matching_service::cancel_match(&db, &id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Match cancelled successfully. Donation and request are now available for new matches.",
        "match": record
    })))
}
