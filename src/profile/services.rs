use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{ChangePasswordRequest, UpdateProfileRequest};
use crate::{
    auth::{dto::PublicUser, password::hash_password, repo_types::User},
    db::is_duplicate,
    error::AppError,
    state::AppState,
    validation::normalize_email,
};

async fn load_user(st: &AppState, user_id: Uuid) -> Result<User, AppError> {
    st.users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

pub async fn update_profile(
    st: &AppState,
    user_id: Uuid,
    req: UpdateProfileRequest,
) -> Result<PublicUser, AppError> {
    let mut user = load_user(st, user_id).await?;

    if let Some(name) = req.name {
        user.name = name.trim().to_string();
    }
    if let Some(phone) = req.phone {
        user.phone = phone;
    }
    if let Some(email) = req.email {
        let email = normalize_email(&email);
        if email != user.email {
            if st.users.exists_by_email(&email).await? {
                warn!(%user_id, email = %email, "email already taken");
                return Err(AppError::Conflict("Email already exists".into()));
            }
            user.email = email;
        }
    }

    if let Err(e) = st.users.update(&user).await {
        if is_duplicate(&e) {
            return Err(AppError::Conflict("Email already exists".into()));
        }
        return Err(e.into());
    }

    info!(%user_id, "profile updated");
    Ok(user.into())
}

/// Replaces the password hash and signs the user out of every session.
pub async fn change_password(
    st: &AppState,
    user_id: Uuid,
    req: ChangePasswordRequest,
) -> Result<(), AppError> {
    let mut user = load_user(st, user_id).await?;
    user.password_hash = hash_password(&req.password)?;
    st.users.update(&user).await?;

    let revoked = st.refresh_tokens.delete_all_for_user(user_id).await?;
    info!(%user_id, revoked, "password changed");
    Ok(())
}
