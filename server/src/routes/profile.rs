use atlas_shared::{ProfileUpdate, UserProfile};
use axum::Json;
use axum::extract::State;
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    state.observability.record_profile_read();
    let profile = state.profiles.get_or_create(&user.id).await.map_err(|e| {
        state.observability.record_store_failure();
        error!(error = %e, user_id = %user.id, "failed to load user profile");
        ApiError::Internal
    })?;
    Ok(Json(profile))
}

pub async fn put_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    state.observability.record_profile_write();
    let profile = update.into_profile();
    let saved = state
        .profiles
        .upsert(&user.id, profile)
        .await
        .map_err(|e| {
            state.observability.record_store_failure();
            error!(error = %e, user_id = %user.id, "failed to save user profile");
            ApiError::Internal
        })?;
    info!(
        user_id = %user.id,
        badge_tier = saved.current_badge_tier_index,
        total_parcels = saved.total_parcels,
        "user profile saved"
    );
    Ok(Json(saved))
}
