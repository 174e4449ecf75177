use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::config::AuthSettings;
use crate::database::Database;
use crate::services::auth_service::{self, AuthResponse, Claims, LoginRequest, RegisterRequest};
use crate::utils::error::AppResult;
use crate::utils::thread_pool::spawn_store_blocking;

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Missing fields or invalid role"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    db: web::Data<Database>,
    settings: web::Data<AuthSettings>,
    request: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let email = request.email.clone().unwrap_or_default();
    log::info!("📝 POST /register - email: {}", email);

    let db = db.get_ref().clone();
    let settings = settings.get_ref().clone();
    let request = request.into_inner();

    // bcrypt is CPU bound, keep it off the workers too
    let response = spawn_store_blocking(move || auth_service::register(&db, &settings, &request)).await?;

    Ok(HttpResponse::Created().json(response))
}

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<Database>,
    settings: web::Data<AuthSettings>,
    request: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let email = request.email.clone().unwrap_or_default();
    log::info!("🔐 POST /login - email: {}", email);

    let db = db.get_ref().clone();
    let settings = settings.get_ref().clone();
    let request = request.into_inner();

    match spawn_store_blocking(move || auth_service::login(&db, &settings, &request)).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user"),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token"),
        (status = 404, description = "User no longer exists")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(db: web::Data<Database>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    log::info!("👤 GET /me - user: {}", claims.sub);

    let db = db.get_ref().clone();
    let user_id = claims.sub.clone();
    let user = spawn_store_blocking(move || auth_service::get_current_user(&db, &user_id)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": user
    })))
}
