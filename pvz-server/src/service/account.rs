//! Registration and login

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Role, User};
use uuid::Uuid;

use crate::auth::JwtService;
use crate::db::PvzStore;
use crate::util::{hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_EMAIL_LEN: usize = 254;
const DUMMY_EMAIL: &str = "dummy@pvz";

pub fn parse_role(raw: &str) -> AppResult<Role> {
    raw.parse()
        .map_err(|_| AppError::new(ErrorCode::InvalidRole).with_detail("role", raw))
}

fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    let valid = email.len() <= MAX_EMAIL_LEN
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(AppError::new(ErrorCode::InvalidEmail));
    }
    Ok(email)
}

fn issue_token(jwt: &JwtService, id: Uuid, email: &str, role: Role) -> AppResult<String> {
    jwt.generate_token(id, email, role).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::internal("Failed to issue token")
    })
}

/// Token for a role without an account (test and demo access)
pub fn dummy_login(jwt: &JwtService, role: &str) -> AppResult<String> {
    let role = parse_role(role)?;
    issue_token(jwt, Uuid::new_v4(), DUMMY_EMAIL, role)
}

pub async fn register(
    store: &dyn PvzStore,
    email: &str,
    password: &str,
    role: &str,
) -> AppResult<User> {
    let email = normalize_email(email)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation("password is too long"));
    }
    let role = parse_role(role)?;

    let hash = hash_password(password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::internal("Failed to process password")
    })?;

    let record = store
        .create_user(&email, &hash, role, shared::util::now())
        .await?;

    tracing::info!(user_id = %record.id, role = %record.role, "User registered");
    Ok(User {
        id: record.id,
        email: record.email,
        role: record.role,
    })
}

/// Verify credentials and issue a token. Unknown email and wrong password
/// produce the same error.
pub async fn login(
    store: &dyn PvzStore,
    jwt: &JwtService,
    email: &str,
    password: &str,
) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(AppError::invalid_credentials());
    }

    issue_token(jwt, user.id, &user.email, user.role)
}
