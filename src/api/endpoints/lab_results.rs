use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;

#[derive(Serialize)]
pub struct LabResultCreated {
    pub ok: bool,
    pub id: i64,
}

/// `POST /api/lab_results`: record a lab update against a case.
///
/// A positive `test_result` confirms the case.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<Value>,
) -> Result<Json<LabResultCreated>, ApiError> {
    let case_id = payload
        .get("case_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("case_id required".into()))?
        .to_string();

    let mut conn = ctx.db()?;
    let id = repository::insert_lab_result(&mut conn, &case_id, &payload)?;
    Ok(Json(LabResultCreated { ok: true, id }))
}
