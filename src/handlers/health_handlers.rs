//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks each record store answers

use crate::{
    models::Record,
    services::{
        dropzone::Dropzone,
        record_store::{Repository, StoreResult},
    },
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;

/// `GET /healthz`
///
/// Very small liveness probe: always returns 200 OK with a plain JSON body.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// Lists every store and reports how many records each holds. HTTP 200 when
/// all stores answer, HTTP 503 when any fails.
pub async fn readyz(State(app): State<Dropzone>) -> impl IntoResponse {
    let mut checks = HashMap::new();
    checks.insert("files", check(app.files().get_all().await));
    checks.insert("sessions", check(app.sessions().get_all().await));
    checks.insert("users", check(app.users().get_all().await));

    let overall_ok = checks.values().all(|c| c.ok);
    let body = ReadyResponse {
        status: if overall_ok {
            "ok".into()
        } else {
            "error".into()
        },
        checks,
    };

    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

fn check<R: Record>(result: StoreResult<Vec<R>>) -> CheckStatus {
    match result {
        Ok(records) => CheckStatus {
            ok: true,
            records: Some(records.len()),
            error: None,
        },
        Err(e) => CheckStatus {
            ok: false,
            records: None,
            error: Some(e.to_string()),
        },
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    records: Option<usize>,
    error: Option<String>,
}
