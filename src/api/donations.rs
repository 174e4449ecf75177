use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::database::Database;
use crate::models::DonationResponse;
use crate::services::auth_service::Claims;
use crate::services::donation_service::{self, DonationPayload};
use crate::utils::error::AppResult;
use crate::utils::thread_pool::spawn_store_blocking;

#[utoipa::path(
    post,
    path = "/api/donations/add",
    tag = "Donations",
    request_body = DonationPayload,
    responses(
        (status = 201, description = "Donation created, pending approval", body = DonationResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Donor account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_donation(
    db: web::Data<Database>,
    claims: web::ReqData<Claims>,
    body: web::Json<DonationPayload>,
) -> AppResult<HttpResponse> {
    log::info!("🎁 POST /donations/add - donor: {}", claims.sub);

    let db = db.get_ref().clone();
    let donor_id = claims.sub.clone();
    let payload = body.into_inner();
    let donation =
        spawn_store_blocking(move || donation_service::create_donation(&db, &donor_id, &payload)).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Donation added successfully! It's pending admin approval.",
        "donation": DonationResponse::from(donation)
    })))
}

#[utoipa::path(
    get,
    path = "/api/donations/my",
    tag = "Donations",
    responses(
        (status = 200, description = "Donations owned by the caller", body = [DonationResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_donations(db: web::Data<Database>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    log::info!("📦 GET /donations/my - donor: {}", claims.sub);

    let db = db.get_ref().clone();
    let donor_id = claims.sub.clone();
    let donations = spawn_store_blocking(move || donation_service::list_donations_by_donor(&db, &donor_id)).await?;

    let donations: Vec<DonationResponse> = donations.into_iter().map(DonationResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "donations": donations
    })))
}

#[utoipa::path(
    put,
    path = "/api/donations/{id}",
    tag = "Donations",
    params(("id" = String, Path, description = "Donation ID")),
    request_body = DonationPayload,
    responses(
        (status = 200, description = "Donation updated", body = DonationResponse),
        (status = 400, description = "Not pending or validation failed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Donation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_donation(
    db: web::Data<Database>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    body: web::Json<DonationPayload>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    log::info!("✏️ PUT /donations/{} - donor: {}", id, claims.sub);

    let db = db.get_ref().clone();
    let donor_id = claims.sub.clone();
    let payload = body.into_inner();
    let donation =
        spawn_store_blocking(move || donation_service::update_donation(&db, &donor_id, &id, &payload)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Donation updated successfully.",
        "donation": DonationResponse::from(donation)
    })))
}

#[utoipa::path(
    delete,
    path = "/api/donations/{id}",
    tag = "Donations",
    params(("id" = String, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "Donation deleted"),
        (status = 400, description = "Not pending"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Donation not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_donation(
    db: web::Data<Database>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    log::info!("🗑️ DELETE /donations/{} - donor: {}", id, claims.sub);

    let db = db.get_ref().clone();
    let donor_id = claims.sub.clone();
    spawn_store_blocking(move || donation_service::delete_donation(&db, &donor_id, &id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Donation deleted successfully."
    })))
}
