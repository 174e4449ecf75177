use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::database::{Database, StoreError};
use crate::models::{Role, User, UserInfo};
use crate::services::validation::non_empty;
use crate::utils::error::{AppError, AppResult};

// Token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
    pub token: String,
}

pub fn issue_token(settings: &AuthSettings, user_id: &str, role: Role) -> AppResult<String> {
    issue_token_at(settings, user_id, role, Utc::now())
}

/// Signs an HS256 token for `user_id`, valid for `token_ttl_hours` from
/// `issued_at`.
pub fn issue_token_at(
    settings: &AuthSettings,
    user_id: &str,
    role: Role,
    issued_at: DateTime<Utc>,
) -> AppResult<String> {
    let exp = Duration::try_hours(settings.token_ttl_hours)
        .and_then(|ttl| issued_at.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(format!("Token TTL out of range: {}h", settings.token_ttl_hours)))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        iat: issued_at.timestamp().max(0) as usize,
        exp: exp.timestamp().max(0) as usize,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.token_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Rejects malformed, tampered and expired tokens. Expiry has no leeway.
pub fn verify_token(settings: &AuthSettings, token: &str) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.token_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Token rejected: {}", e);
        AppError::Forbidden("Invalid or expired token.".to_string())
    })
}

pub fn hash_password(settings: &AuthSettings, password: &str) -> AppResult<String> {
    hash(password, settings.bcrypt_cost)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

// User registration
pub fn register(
    db: &Database,
    settings: &AuthSettings,
    request: &RegisterRequest,
) -> AppResult<AuthResponse> {
    // Blank check only. The password itself is hashed as sent, like login verifies it.
    let (Some(name), Some(email), Some(_), Some(role), Some(password)) = (
        non_empty(&request.name),
        non_empty(&request.email),
        non_empty(&request.password),
        non_empty(&request.role),
        request.password.as_deref(),
    ) else {
        return Err(AppError::validation("All fields are required."));
    };

    let role = Role::parse(role).ok_or_else(|| AppError::validation("Invalid role specified."))?;
    let email = email.to_lowercase();

    if db.users.find_by_email(&email)?.is_some() {
        return Err(AppError::Conflict("User with this email already exists.".to_string()));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        password_hash: hash_password(settings, password)?,
        role,
        created_at: now,
        updated_at: now,
    };

    // The store re-checks the email under its write lock.
    match db.users.insert(user.clone()) {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::Conflict("User with this email already exists.".to_string()))
        }
        Err(e) => return Err(e.into()),
    }

    let token = issue_token(settings, &user.id, user.role)?;

    log::info!("✅ User registered successfully: {} (role: {})", user.email, user.role);

    Ok(AuthResponse {
        success: true,
        message: "Registration successful!".to_string(),
        user: UserInfo::from(&user),
        token,
    })
}

// User login
pub fn login(db: &Database, settings: &AuthSettings, request: &LoginRequest) -> AppResult<AuthResponse> {
    let (Some(email), Some(password)) = (non_empty(&request.email), request.password.as_deref()) else {
        return Err(AppError::validation("Email and password are required."));
    };
    if password.is_empty() {
        return Err(AppError::validation("Email and password are required."));
    }

    let invalid = || AppError::Unauthorized("Invalid email or password.".to_string());

    let user = db.users.find_by_email(email)?.ok_or_else(invalid)?;

    let valid = verify(password, &user.password_hash).unwrap_or_else(|e| {
        log::warn!("⚠️  Password verification error for {}: {}", user.email, e);
        false
    });
    if !valid {
        return Err(invalid());
    }

    let token = issue_token(settings, &user.id, user.role)?;

    Ok(AuthResponse {
        success: true,
        message: "Login successful!".to_string(),
        user: UserInfo::from(&user),
        token,
    })
}

// Get current user
pub fn get_current_user(db: &Database, user_id: &str) -> AppResult<UserInfo> {
    db.users
        .find_by_id(user_id)?
        .map(|user| UserInfo::from(&user))
        .ok_or_else(|| AppError::not_found("User not found."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::empty_db;

    fn settings() -> AuthSettings {
        AuthSettings {
            token_secret: "test-secret".to_string(),
            token_ttl_hours: 24,
            bcrypt_cost: 4,
        }
    }

    fn register_request(email: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("Ann".to_string()),
            email: Some(email.to_string()),
            password: Some("hunter22".to_string()),
            role: Some(role.to_string()),
        }
    }

    #[test]
    fn test_register_then_login() {
        let db = empty_db();
        let settings = settings();

        let registered = register(&db, &settings, &register_request("Ann@Example.com", "donor")).unwrap();
        assert_eq!(registered.user.email, "ann@example.com");
        assert_eq!(registered.user.role, Role::Donor);

        let claims = verify_token(&settings, &registered.token).unwrap();
        assert_eq!(claims.sub, registered.user.id);
        assert_eq!(claims.role, Role::Donor);

        let logged_in = login(
            &db,
            &settings,
            &LoginRequest {
                email: Some("ANN@example.com".to_string()),
                password: Some("hunter22".to_string()),
            },
        )
        .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[test]
    fn test_password_with_surrounding_spaces_logs_in_as_sent() {
        let db = empty_db();
        let settings = settings();

        let mut request = register_request("ann@example.com", "donor");
        request.password = Some(" pass phrase ".to_string());
        let registered = register(&db, &settings, &request).unwrap();

        let as_sent = LoginRequest {
            email: Some("ann@example.com".to_string()),
            password: Some(" pass phrase ".to_string()),
        };
        assert_eq!(login(&db, &settings, &as_sent).unwrap().user.id, registered.user.id);

        let trimmed = LoginRequest {
            email: Some("ann@example.com".to_string()),
            password: Some("pass phrase".to_string()),
        };
        assert!(matches!(login(&db, &settings, &trimmed), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_token_ttl_out_of_range_is_an_error() {
        let huge = AuthSettings {
            token_ttl_hours: i64::MAX,
            ..settings()
        };
        assert!(matches!(issue_token(&huge, "u1", Role::Donor), Err(AppError::Internal(_))));
    }

    #[test]
    fn test_password_is_not_stored_in_plain_text() {
        let db = empty_db();
        let response = register(&db, &settings(), &register_request("ann@example.com", "donor")).unwrap();

        let stored = db.users.find_by_id(&response.user.id).unwrap().unwrap();
        assert_ne!(stored.password_hash, "hunter22");
        assert!(verify("hunter22", &stored.password_hash).unwrap());
    }

    #[test]
    fn test_duplicate_email_any_case_conflicts() {
        let db = empty_db();
        let settings = settings();
        register(&db, &settings, &register_request("ann@example.com", "donor")).unwrap();

        let err = register(&db, &settings, &register_request("ANN@EXAMPLE.COM", "receiver")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_register_validation() {
        let db = empty_db();
        let settings = settings();

        let mut missing = register_request("ann@example.com", "donor");
        missing.password = Some(String::new());
        let err = register(&db, &settings, &missing).unwrap_err();
        assert_eq!(err.to_string(), "All fields are required.");

        let err = register(&db, &settings, &register_request("ann@example.com", "superuser")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid role specified.");
    }

    #[test]
    fn test_login_rejects_wrong_password_and_unknown_email() {
        let db = empty_db();
        let settings = settings();
        register(&db, &settings, &register_request("ann@example.com", "donor")).unwrap();

        let wrong = LoginRequest {
            email: Some("ann@example.com".to_string()),
            password: Some("nope".to_string()),
        };
        assert!(matches!(login(&db, &settings, &wrong), Err(AppError::Unauthorized(_))));

        let unknown = LoginRequest {
            email: Some("bob@example.com".to_string()),
            password: Some("hunter22".to_string()),
        };
        assert!(matches!(login(&db, &settings, &unknown), Err(AppError::Unauthorized(_))));

        let empty = LoginRequest { email: None, password: None };
        assert!(matches!(login(&db, &settings, &empty), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let settings = settings();
        let issued = Utc::now() - Duration::hours(25);
        let token = issue_token_at(&settings, "u1", Role::Admin, issued).unwrap();

        assert!(matches!(verify_token(&settings, &token), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_tampered_or_foreign_token_rejected() {
        let settings = settings();
        let token = issue_token(&settings, "u1", Role::Donor).unwrap();

        let other = AuthSettings {
            token_secret: "another-secret".to_string(),
            ..settings.clone()
        };
        assert!(verify_token(&other, &token).is_err());
        assert!(verify_token(&settings, "not-a-token").is_err());

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1].push('A');
        assert!(verify_token(&settings, &parts.join(".")).is_err());
    }
}
