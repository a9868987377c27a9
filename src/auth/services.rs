use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginRequest, PublicUser, RegisterRequest, TokenPair},
    jwt::JwtKeys,
    password::{hash_password, hash_token, verify_credentials},
    repo_types::{RefreshToken, User},
};
use crate::{db::is_duplicate, error::AppError, state::AppState, validation::normalize_email};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_REFRESH: &str = "Invalid refresh token";

pub async fn register(st: &AppState, req: RegisterRequest) -> Result<PublicUser, AppError> {
    let email = normalize_email(&req.email);

    if st.users.exists_by_email(&email).await? {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already exists".into()));
    }

    let user = User {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        email,
        password_hash: hash_password(&req.password)?,
        phone: req.phone,
        created_at: OffsetDateTime::now_utc(),
    };

    // A concurrent registration may win between the check and the insert.
    if let Err(e) = st.users.create(&user).await {
        if is_duplicate(&e) {
            warn!(email = %user.email, "email already registered");
            return Err(AppError::Conflict("Email already exists".into()));
        }
        return Err(e.into());
    }

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user.into())
}

pub async fn login(st: &AppState, req: LoginRequest) -> Result<TokenPair, AppError> {
    let email = normalize_email(&req.email);

    // Both failure paths run Argon2 so timing does not reveal whether the
    // email is registered.
    let found = st.users.find_by_email(&email).await?;
    let stored = found.as_ref().map(|u| u.password_hash.as_str());
    let verified = verify_credentials(&req.password, stored)?;

    let user = match found {
        Some(user) if verified => user,
        Some(user) => {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let pair = issue_tokens(st, user.id).await?;
    info!(user_id = %user.id, "user logged in");
    Ok(pair)
}

/// Exchanges a refresh token for a new pair. The presented token is replaced
/// by the new one, so replaying it fails.
pub async fn refresh(st: &AppState, raw_refresh_token: &str) -> Result<TokenPair, AppError> {
    let keys = JwtKeys::from_config(&st.config.jwt);
    let claims = keys.verify_refresh(raw_refresh_token).map_err(|e| {
        warn!(error = %e, "refresh token rejected");
        AppError::Unauthorized(INVALID_REFRESH.into())
    })?;

    let Some(user) = st.users.find_by_id(claims.sub).await? else {
        warn!(user_id = %claims.sub, "refresh for missing user");
        return Err(AppError::Unauthorized(INVALID_REFRESH.into()));
    };

    // Sign first, then swap the stored hash in one step so a failure never
    // leaves the user without a valid refresh token.
    let (pair, record) = sign_pair(st, user.id)?;
    let hashed = hash_token(raw_refresh_token);
    if !st.refresh_tokens.rotate(user.id, &hashed, &record).await? {
        warn!(user_id = %user.id, "refresh token not found or already used");
        return Err(AppError::Unauthorized(INVALID_REFRESH.into()));
    }

    info!(user_id = %user.id, "tokens refreshed");
    Ok(pair)
}

/// Resolves an access token to the caller's public profile.
pub async fn user_from_token(st: &AppState, access_token: &str) -> Result<PublicUser, AppError> {
    let keys = JwtKeys::from_config(&st.config.jwt);
    let claims = keys.verify_access(access_token).map_err(|e| {
        warn!(error = %e, "access token rejected");
        AppError::Unauthorized("Invalid access token".into())
    })?;
    Ok(require_user(st, claims.sub).await?.into())
}

/// Loads the authenticated user, treating a vanished record as unauthenticated.
pub async fn require_user(st: &AppState, user_id: Uuid) -> Result<User, AppError> {
    st.users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))
}

async fn issue_tokens(st: &AppState, user_id: Uuid) -> anyhow::Result<TokenPair> {
    let (pair, record) = sign_pair(st, user_id)?;
    st.refresh_tokens.insert(&record).await?;
    Ok(pair)
}

fn sign_pair(st: &AppState, user_id: Uuid) -> anyhow::Result<(TokenPair, RefreshToken)> {
    let keys = JwtKeys::from_config(&st.config.jwt);
    let access_token = keys.sign_access(user_id)?;
    let refresh_token = keys.sign_refresh(user_id)?;
    let record = RefreshToken::new(user_id, hash_token(&refresh_token), keys.refresh_expires_at());
    Ok((
        TokenPair {
            access_token,
            refresh_token,
        },
        record,
    ))
}
