use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::Officer;

#[derive(Deserialize)]
pub struct UserQuery {
    pub pin: Option<String>,
}

/// `GET /api/users?pin=...`: officer lookup for login. Answers with the
/// (possibly empty) list of matches; the client treats empty as an
/// invalid PIN.
pub async fn lookup(
    State(ctx): State<ApiContext>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Officer>>, ApiError> {
    let pin = query
        .pin
        .filter(|pin| !pin.is_empty())
        .ok_or_else(|| ApiError::BadRequest("pin query required".into()))?;

    let conn = ctx.db()?;
    Ok(Json(repository::find_users_by_pin(&conn, &pin)?))
}

#[derive(Serialize)]
pub struct UserCreated {
    pub ok: bool,
}

/// `POST /api/users`: provision an officer account.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(officer): Json<Officer>,
) -> Result<Json<UserCreated>, ApiError> {
    let conn = ctx.db()?;
    repository::insert_user(&conn, &officer)?;
    tracing::info!(staff_id = %officer.staff_id, "officer account created");
    Ok(Json(UserCreated { ok: true }))
}
