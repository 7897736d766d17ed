use std::str::FromStr;

use chrono::Datelike;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use serde_json::Value;

use super::DatabaseError;
use crate::models::{CaseStatus, Officer};

// ═══════════════════════════════════════════
// Case Repository
// ═══════════════════════════════════════════

/// Registry row for one submitted case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRow {
    pub case_id: String,
    pub region: Option<String>,
    pub district: Option<String>,
    pub disease: Option<String>,
    pub species: Option<String>,
    pub date_reported: Option<String>,
    pub status: CaseStatus,
    pub payload: Value,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabResultRow {
    pub id: i64,
    pub case_id: String,
    pub payload: Value,
    pub created_at: String,
}

/// Allocate the next authoritative case id: `VSD-<year>-<6-digit-seq>`
/// from the single global counter. Must run inside the caller's
/// transaction so concurrent submissions never observe the same number.
fn next_case_id(conn: &Connection, year: i32) -> Result<String, DatabaseError> {
    let last: i64 = conn.query_row(
        "SELECT last_num FROM counters WHERE name = 'vsd'",
        [],
        |row| row.get(0),
    )?;
    let next = last + 1;
    conn.execute(
        "UPDATE counters SET last_num = ?1 WHERE name = 'vsd'",
        params![next],
    )?;
    Ok(format!("VSD-{year}-{next:06}"))
}

/// Persist a field submission and return its assigned case id.
///
/// Counter increment and insert share one transaction.
pub fn insert_case(conn: &mut Connection, payload: &Value) -> Result<String, DatabaseError> {
    insert_case_for_year(conn, payload, chrono::Local::now().year())
}

pub fn insert_case_for_year(
    conn: &mut Connection,
    payload: &Value,
    year: i32,
) -> Result<String, DatabaseError> {
    let text = |key: &str| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let tx = conn.transaction()?;
    let case_id = next_case_id(&tx, year)?;
    tx.execute(
        "INSERT INTO cases (case_id, region, district, disease, species, date_reported, status, payload_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            case_id,
            text("region"),
            text("district"),
            text("disease"),
            text("species"),
            text("date_reported"),
            CaseStatus::Suspected.as_str(),
            payload.to_string(),
        ],
    )?;
    tx.commit()?;
    Ok(case_id)
}

/// The case row plus all its lab-result rows. `None` for unknown ids.
pub fn get_case_with_labs(
    conn: &Connection,
    case_id: &str,
) -> Result<Option<(CaseRow, Vec<LabResultRow>)>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT case_id, region, district, disease, species, date_reported, status, payload_json, created_at
             FROM cases WHERE case_id = ?1",
            params![case_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            },
        )
        .optional()?;

    let Some((case_id, region, district, disease, species, date_reported, status, payload, created_at)) = row
    else {
        return Ok(None);
    };

    let case = CaseRow {
        case_id,
        region,
        district,
        disease,
        species,
        date_reported,
        status: CaseStatus::from_str(&status)?,
        payload: serde_json::from_str(&payload).unwrap_or(Value::Null),
        created_at,
    };

    let mut stmt = conn.prepare(
        "SELECT id, case_id, payload_json, created_at FROM lab_results
         WHERE case_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![case.case_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut labs = Vec::new();
    for row in rows {
        let (id, case_id, payload, created_at) = row?;
        labs.push(LabResultRow {
            id,
            case_id,
            payload: serde_json::from_str(&payload).unwrap_or(Value::Null),
            created_at,
        });
    }

    Ok(Some((case, labs)))
}

// ═══════════════════════════════════════════
// Lab Result Repository
// ═══════════════════════════════════════════

/// Record a lab update against an existing case.
///
/// Unknown case ids fail with `NotFound`. A positive test result
/// (case-insensitive) confirms the case.
pub fn insert_lab_result(
    conn: &mut Connection,
    case_id: &str,
    payload: &Value,
) -> Result<i64, DatabaseError> {
    let tx = conn.transaction()?;

    let known: Option<i64> = tx
        .query_row(
            "SELECT 1 FROM cases WHERE case_id = ?1",
            params![case_id],
            |row| row.get(0),
        )
        .optional()?;
    if known.is_none() {
        return Err(DatabaseError::NotFound {
            entity_type: "case".into(),
            id: case_id.to_string(),
        });
    }

    tx.execute(
        "INSERT INTO lab_results (case_id, payload_json) VALUES (?1, ?2)",
        params![case_id, payload.to_string()],
    )?;
    let id = tx.last_insert_rowid();

    let result = payload
        .get("test_result")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if result.eq_ignore_ascii_case("positive") {
        tx.execute(
            "UPDATE cases SET status = ?1 WHERE case_id = ?2",
            params![CaseStatus::Confirmed.as_str(), case_id],
        )?;
    }

    tx.commit()?;
    Ok(id)
}

// ═══════════════════════════════════════════
// User Repository
// ═══════════════════════════════════════════

pub fn insert_user(conn: &Connection, officer: &Officer) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (staff_id, name, job_description, contact_number, pin, role)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            officer.staff_id,
            officer.name,
            officer.job_description,
            officer.contact_number,
            officer.pin,
            officer.role.as_str(),
        ],
    )?;
    Ok(())
}

pub fn find_users_by_pin(conn: &Connection, pin: &str) -> Result<Vec<Officer>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT staff_id, name, job_description, contact_number, pin, role
         FROM users WHERE pin = ?1",
    )?;
    let rows = stmt.query_map(params![pin], |row| {
        Ok((
            row.get::<_, Option<String>>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut users = Vec::new();
    for row in rows {
        let (staff_id, name, job_description, contact_number, pin, role) = row?;
        users.push(Officer {
            staff_id: staff_id.unwrap_or_default(),
            name,
            job_description: job_description.unwrap_or_default(),
            contact_number: contact_number.unwrap_or_default(),
            pin,
            role: role.parse()?,
        });
    }
    Ok(users)
}
