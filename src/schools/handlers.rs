use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{SchoolListResponse, UpdateSchoolListRequest},
    repo_types::SchoolListRecord,
};
use crate::{
    auth::{dto::MessageResponse, jwt::AuthUser, repo_types::User},
    error::ApiError,
    state::AppState,
};

pub fn school_routes() -> Router<AppState> {
    Router::new().route("/schools", get(get_school_list).put(update_school_list))
}

/// The token only proves a username; the row may have gone away since it was issued.
async fn load_user(state: &AppState, username: &str) -> Result<User, ApiError> {
    match User::find_by_username(&state.db, username).await {
        Ok(Some(u)) => Ok(u),
        Ok(None) => {
            warn!(username = %username, "token subject has no user row");
            Err(ApiError::NotFound("User not found".into()))
        }
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            Err(ApiError::Internal)
        }
    }
}

#[instrument(skip(state))]
pub async fn get_school_list(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<SchoolListResponse>, ApiError> {
    let user = load_user(&state, &username).await?;

    let record = match SchoolListRecord::find_by_user(&state.db, user.id).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, user_id = user.id, "load school list failed");
            return Err(ApiError::Internal);
        }
    };

    let Some(record) = record else {
        return Ok(Json(SchoolListResponse::default()));
    };

    let school_list = record.school_list_json().map_err(|e| {
        error!(error = %e, user_id = record.user_id, "stored school_list is not valid JSON");
        ApiError::Internal
    })?;

    Ok(Json(SchoolListResponse {
        school_list,
        last_modified: record.last_modified,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_school_list(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    payload: Result<Json<UpdateSchoolListRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;

    let (Some(school_list), Some(last_modified)) = (payload.school_list, payload.last_modified)
    else {
        warn!(username = %username, "update missing school_list or last_modified");
        return Err(ApiError::Validation(
            "school_list and last_modified are required".into(),
        ));
    };

    let user = load_user(&state, &username).await?;

    if let Err(e) =
        SchoolListRecord::upsert(&state.db, user.id, &school_list, &last_modified).await
    {
        error!(error = %e, user_id = user.id, "upsert school list failed");
        return Err(ApiError::Internal);
    }

    info!(user_id = user.id, last_modified = %last_modified, "school list updated");
    Ok(Json(MessageResponse {
        message: "School list updated successfully".into(),
    }))
}
