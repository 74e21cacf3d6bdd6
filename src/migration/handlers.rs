use axum::{body::Bytes, extract::State, Json};
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use super::{
    models::Account,
    types::{CheckRequest, CheckResponse, SubmitRequest, SubmitResponse},
};
use crate::shared::{AppError, AppState};

/// Parses a JSON body regardless of content type. Unparsable bodies carry no fields.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unparsable request body");
        T::default()
    })
}

/// HTTP handler for checking migration status
///
/// POST /api/check
#[instrument(name = "check_migration", skip(state, body))]
pub async fn check_migration(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CheckResponse>, AppError> {
    let request: CheckRequest = parse_body(&body);
    let Some(account) = Account::from_optional(request.address.as_deref()) else {
        info!("Check requested without an address");
        return Ok(Json(CheckResponse::missing_address()));
    };

    let response = match state.migration_service.check(&account).await? {
        Some(record) => CheckResponse::migrated(record.experience),
        None => CheckResponse::not_migrated(),
    };

    Ok(Json(response))
}

/// HTTP handler for submitting a migration
///
/// POST /api/submit
/// Domain rejections come back through `AppError::Rejected` as
/// `success: false` with a reason.
#[instrument(name = "submit_migration", skip(state, body))]
pub async fn submit_migration(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, AppError> {
    let request: SubmitRequest = parse_body(&body);

    let experience = state
        .migration_service
        .submit(request.address.as_deref(), request.signature.as_deref())
        .await?;

    Ok(Json(SubmitResponse::committed(experience)))
}
