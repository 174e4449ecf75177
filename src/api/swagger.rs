use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Donation Hub API",
        version = "1.0.0",
        description = "Donors post items they can give, receivers post what they need, and admins review both and pair them into matches.\n\n**Authentication:** role-gated endpoints expect `Authorization: Bearer <token>` from `/api/login` or `/api/register`."
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::get_me,

        // Donor
        crate::api::donations::add_donation,
        crate::api::donations::my_donations,
        crate::api::donations::update_donation,
        crate::api::donations::delete_donation,

        // Receiver
        crate::api::requests::add_request,
        crate::api::requests::my_requests,
        crate::api::requests::update_request,
        crate::api::requests::delete_request,

        // Admin
        crate::api::admin::list_donations,
        crate::api::admin::review_donation,
        crate::api::admin::list_requests,
        crate::api::admin::review_request,
        crate::api::admin::create_match,
        crate::api::admin::list_matches,
        crate::api::admin::complete_match,
        crate::api::admin::cancel_match,

        // Public
        crate::api::public::donations,
        crate::api::public::requests,
        crate::api::public::search,
        crate::api::public::activities,

        crate::api::seed::seed_demo_data,
        crate::api::health::health_check,
        crate::api::health::ping,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::models::UserInfo,
            crate::models::Role,

            crate::models::Category,
            crate::models::ItemStatus,
            crate::models::Urgency,
            crate::models::Donation,
            crate::models::DonationResponse,
            crate::models::PublicDonation,
            crate::models::ItemRequest,
            crate::models::ItemRequestResponse,
            crate::models::PublicRequest,
            crate::services::donation_service::DonationPayload,
            crate::services::request_service::ItemRequestPayload,

            crate::api::admin::ReviewRequest,
            crate::services::matching_service::CreateMatchRequest,
            crate::models::Match,
            crate::models::MatchStatus,
            crate::models::MatchDetails,
            crate::models::DonationSummary,
            crate::models::RequestSummary,

            crate::services::public_service::SearchResults,
            crate::services::public_service::Activity,
            crate::services::public_service::ActivityKind,
            crate::seeds::demo_seed::SeedCounts,
            crate::api::health::HealthResponse,
            crate::api::health::PingResponse,
            crate::api::metrics::MetricsSnapshot,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and the current user."),
        (name = "Donations", description = "Donor-owned donations. Editable only while pending."),
        (name = "Requests", description = "Receiver-owned requests. Editable only while pending."),
        (name = "Admin", description = "Review queue and matching."),
        (name = "Public", description = "Unauthenticated listings, search and activity feed."),
        (name = "Seed", description = "Demo data."),
        (name = "Health", description = "Health, ping and metrics."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from /api/login or /api/register"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_role_gated_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/donations/add"));
        assert!(paths.contains_key("/api/admin/matches/{id}/cancel"));
        assert!(paths.contains_key("/api/public/search"));
        assert!(doc.components.unwrap().security_schemes.contains_key("bearer_auth"));
    }
}
