pub mod admin;
pub mod auth;
pub mod donations;
pub mod health;
pub mod metrics;
pub mod public;
pub mod requests;
pub mod seed;
pub mod swagger;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::middleware::RequireRole;
use crate::models::Role;
use crate::utils::error::AppError;

/// Registers every route. Handlers expect `web::Data` of `Database`,
/// `AuthSettings` and `AppConfig` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        .service(
            web::scope("/api")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .route("/ping", web::get().to(health::ping))
                .route("/seed", web::post().to(seed::seed_demo_data))
                .service(
                    web::resource("/me")
                        .wrap(RequireRole::any())
                        .route(web::get().to(auth::get_me)),
                )
                .service(
                    web::scope("/donations")
                        .wrap(RequireRole::new(&[Role::Donor]))
                        .route("/add", web::post().to(donations::add_donation))
                        .route("/my", web::get().to(donations::my_donations))
                        .route("/{id}", web::put().to(donations::update_donation))
                        .route("/{id}", web::delete().to(donations::delete_donation)),
                )
                .service(
                    web::scope("/requests")
                        .wrap(RequireRole::new(&[Role::Receiver]))
                        .route("/add", web::post().to(requests::add_request))
                        .route("/my", web::get().to(requests::my_requests))
                        .route("/{id}", web::put().to(requests::update_request))
                        .route("/{id}", web::delete().to(requests::delete_request)),
                )
                .service(
                    web::scope("/admin")
                        .wrap(RequireRole::new(&[Role::Admin]))
                        .route("/donations", web::get().to(admin::list_donations))
                        .route("/donations/{id}/approve", web::put().to(admin::review_donation))
                        .route("/requests", web::get().to(admin::list_requests))
                        .route("/requests/{id}/approve", web::put().to(admin::review_request))
                        .route("/match", web::post().to(admin::create_match))
                        .route("/matches", web::get().to(admin::list_matches))
                        .route("/matches/{id}/complete", web::put().to(admin::complete_match))
                        .route("/matches/{id}/cancel", web::put().to(admin::cancel_match)),
                )
                .service(
                    web::scope("/public")
                        .route("/donations", web::get().to(public::donations))
                        .route("/requests", web::get().to(public::requests))
                        .route("/search", web::get().to(public::search))
                        .route("/activities", web::get().to(public::activities)),
                )
                .default_service(web::to(api_not_found)),
        );
}

async fn api_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": "API endpoint not found"
    }))
}

/// Malformed bodies get the same JSON error shape as everything else.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("⚠️  Rejected JSON body: {}", err);
        AppError::validation(format!("Invalid request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::validation(format!("Invalid query string: {}", err)).into()
    })
}
