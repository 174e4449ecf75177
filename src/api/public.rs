use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::database::Database;
use crate::models::{PublicDonation, PublicRequest};
use crate::services::public_service::{self, Activity, SearchQuery, SearchResults};
use crate::utils::error::AppResult;
use crate::utils::thread_pool::spawn_store_blocking;

#[utoipa::path(
    get,
    path = "/api/public/donations",
    tag = "Public",
    responses((status = 200, description = "Approved donations, newest first", body = [PublicDonation]))
)]
pub async fn donations(db: web::Data<Database>) -> AppResult<HttpResponse> {
    let db = db.get_ref().clone();
    let donations = spawn_store_blocking(move || public_service::public_donations(&db)).await?;

    log::debug!("🌍 GET /public/donations - {} items", donations.len());
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "donations": donations
    })))
}

#[utoipa::path(
    get,
    path = "/api/public/requests",
    tag = "Public",
    responses((status = 200, description = "Approved requests, urgent first", body = [PublicRequest]))
)]
pub async fn requests(db: web::Data<Database>) -> AppResult<HttpResponse> {
    let db = db.get_ref().clone();
    let requests = spawn_store_blocking(move || public_service::public_requests(&db)).await?;

    log::debug!("🌍 GET /public/requests - {} items", requests.len());
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "requests": requests
    })))
}

#[utoipa::path(
    get,
    path = "/api/public/search",
    tag = "Public",
    params(SearchQuery),
    responses((status = 200, description = "Filtered and ranked listings", body = SearchResults))
)]
pub async fn search(db: web::Data<Database>, query: web::Query<SearchQuery>) -> AppResult<HttpResponse> {
    log::info!("🔍 GET /public/search - {:?}", query);

    let db = db.get_ref().clone();
    let query = query.into_inner();
    let results = spawn_store_blocking(move || public_service::search(&db, &query, Utc::now())).await?;

    Ok(HttpResponse::Ok().json(results))
}

#[utoipa::path(
    get,
    path = "/api/public/activities",
    tag = "Public",
    responses((status = 200, description = "Latest approved items as a feed", body = [Activity]))
)]
pub async fn activities(db: web::Data<Database>) -> AppResult<HttpResponse> {
    let db = db.get_ref().clone();
    let activities = spawn_store_blocking(move || public_service::activities(&db)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "activities": activities
    })))
}
