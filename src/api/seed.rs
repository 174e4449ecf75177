use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::database::Database;
use crate::seeds::demo_seed::{self, SeedCounts};
use crate::utils::error::AppResult;
use crate::utils::thread_pool::spawn_store_blocking;

#[utoipa::path(
    post,
    path = "/api/seed",
    tag = "Seed",
    responses((status = 200, description = "Sample data appended", body = SeedCounts))
)]
pub async fn seed_demo_data(db: web::Data<Database>) -> AppResult<HttpResponse> {
    log::info!("🌱 POST /seed");

    let db = db.get_ref().clone();
    let counts = spawn_store_blocking(move || demo_seed::seed_demo_data(&db)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!(
            "Seeded {} donations and {} requests to CSV files.",
            counts.donations, counts.requests
        ),
        "data": counts
    })))
}
