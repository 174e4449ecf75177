use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::config::AuthSettings;
use crate::models::Role;
use crate::services::auth_service::{self, Claims};
use crate::utils::error::{AppError, AppResult};

/// Guards a scope or resource: the caller must send a valid bearer token
/// whose role is in the allowed set. On success the decoded [`Claims`] are
/// stored in the request extensions for `web::ReqData<Claims>`.
///
/// Reads [`AuthSettings`] from `web::Data`, so the app must register it.
#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<Vec<Role>>,
}

impl RequireRole {
    pub fn new(roles: &[Role]) -> Self {
        Self {
            allowed: Rc::new(roles.to_vec()),
        }
    }

    /// Any authenticated user.
    pub fn any() -> Self {
        Self::new(&[Role::Admin, Role::Donor, Role::Receiver])
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service,
            allowed: Rc::clone(&self.allowed),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: S,
    allowed: Rc<Vec<Role>>,
}

/// Auth scheme names are case-insensitive.
fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    let (scheme, token) = req.headers().get(AUTHORIZATION)?.to_str().ok()?.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn authorize(req: &ServiceRequest, allowed: &[Role]) -> AppResult<Claims> {
    let settings = req
        .app_data::<web::Data<AuthSettings>>()
        .ok_or_else(|| AppError::Internal("AuthSettings not registered".to_string()))?;

    let token = bearer_token(req).ok_or_else(|| AppError::Unauthorized("Access token required.".to_string()))?;
    let claims = auth_service::verify_token(settings, token)?;

    if !allowed.contains(&claims.role) {
        log::warn!("🚫 {} denied for {} (role: {})", req.path(), claims.sub, claims.role);
        return Err(AppError::Forbidden("Insufficient permissions.".to_string()));
    }
    Ok(claims)
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authorize(&req, &self.allowed) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(e) => {
                let response = e.error_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use chrono::{Duration, Utc};

    fn settings() -> AuthSettings {
        AuthSettings {
            token_secret: "middleware-secret".to_string(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
        }
    }

    async fn whoami(claims: web::ReqData<Claims>) -> HttpResponse {
        HttpResponse::Ok().body(claims.sub.clone())
    }

    macro_rules! guarded_app {
        () => {
            test::init_service(
                App::new().app_data(web::Data::new(settings())).service(
                    web::scope("/admin")
                        .wrap(RequireRole::new(&[Role::Admin]))
                        .route("/whoami", web::get().to(whoami)),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let app = guarded_app!();

        let req = test::TestRequest::get().uri("/admin/whoami").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Access token required.");
    }

    #[actix_web::test]
    async fn test_bad_or_expired_token_is_forbidden() {
        let app = guarded_app!();

        let req = test::TestRequest::get()
            .uri("/admin/whoami")
            .insert_header((AUTHORIZATION, "Bearer not-a-token"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let stale = auth_service::issue_token_at(&settings(), "admin1", Role::Admin, Utc::now() - Duration::hours(2))
            .unwrap();
        let req = test::TestRequest::get()
            .uri("/admin/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", stale)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_role_check() {
        let app = guarded_app!();

        let donor = auth_service::issue_token(&settings(), "donor1", Role::Donor).unwrap();
        let req = test::TestRequest::get()
            .uri("/admin/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", donor)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Insufficient permissions.");

        let admin = auth_service::issue_token(&settings(), "admin1", Role::Admin).unwrap();
        let req = test::TestRequest::get()
            .uri("/admin/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", admin)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "admin1");
    }

    #[actix_web::test]
    async fn test_scheme_name_ignores_case() {
        let app = guarded_app!();
        let admin = auth_service::issue_token(&settings(), "admin1", Role::Admin).unwrap();

        for scheme in ["bearer", "BEARER", "BeArEr"] {
            let req = test::TestRequest::get()
                .uri("/admin/whoami")
                .insert_header((AUTHORIZATION, format!("{} {}", scheme, admin)))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        for header in ["Basic abc", "Bearer", "Bearer    ", admin.as_str()] {
            let req = test::TestRequest::get()
                .uri("/admin/whoami")
                .insert_header((AUTHORIZATION, header.to_string()))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
