use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;

#[derive(Serialize)]
pub struct CreatedCase {
    pub case_id: String,
}

/// `POST /api/cases`: persist a field submission.
///
/// The full payload is stored verbatim; the response carries the
/// registry-assigned id.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<Value>,
) -> Result<Json<CreatedCase>, ApiError> {
    let mut conn = ctx.db()?;
    let case_id = repository::insert_case(&mut conn, &payload)?;
    tracing::info!(%case_id, "case registered");
    Ok(Json(CreatedCase { case_id }))
}

#[derive(Deserialize)]
pub struct CaseQuery {
    pub case_id: Option<String>,
}

/// `GET /api/cases?case_id=...`: the case row plus its lab results.
pub async fn fetch(
    State(ctx): State<ApiContext>,
    Query(query): Query<CaseQuery>,
) -> Result<Json<Value>, ApiError> {
    let case_id = query
        .case_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("case_id query required".into()))?;

    let conn = ctx.db()?;
    let (case, labs) = repository::get_case_with_labs(&conn, &case_id)?
        .ok_or_else(|| ApiError::NotFound("Case not found".into()))?;

    let mut body = serde_json::to_value(&case)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    body["lab_results"] =
        serde_json::to_value(&labs).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(body))
}
