// src/handlers/stock.rs

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::stock::{IssueStockPayload, ReceiveStockPayload},
    services::export::stock_to_csv,
};

/// Optional clinic narrowing, e.g. `?clinic=Clinic 2 - Mombasa`. The
/// effective scope is always resolved against the caller's role.
#[derive(Debug, Deserialize)]
pub struct ClinicQuery {
    pub clinic: Option<String>,
}

// ---
// Handler: current stock, classified
// ---
pub async fn list_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ClinicQuery>,
) -> Result<impl IntoResponse, AppError> {
    let scope = user.resolve_view_scope(query.clinic.as_deref())?;
    let stock = app_state.stock_service.current_stock(&scope).await?;
    Ok((StatusCode::OK, Json(stock)))
}

// ---
// Handler: expired / near-expiry / low-stock counts
// ---
pub async fn stock_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ClinicQuery>,
) -> Result<impl IntoResponse, AppError> {
    let scope = user.resolve_view_scope(query.clinic.as_deref())?;
    let summary = app_state.stock_service.summary(&scope).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// ---
// Handler: receive new stock (always a new batch record)
// ---
pub async fn receive_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ReceiveStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let clinic = user.resolve_receive_clinic(payload.clinic.as_deref())?;
    let medicine = app_state
        .stock_service
        .receive_stock(&clinic, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(medicine)))
}

// ---
// Handler: issue stock to a patient
// ---
pub async fn issue_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<IssueStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let updated = app_state.stock_service.issue_stock(&user, &payload).await?;

    Ok((StatusCode::OK, Json(updated)))
}

// ---
// Handler: CSV download of the current view
// ---
pub async fn export_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ClinicQuery>,
) -> Result<impl IntoResponse, AppError> {
    let scope = user.resolve_view_scope(query.clinic.as_deref())?;
    let stock = app_state.stock_service.current_stock(&scope).await?;
    let csv_bytes = stock_to_csv(&stock)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"stock.csv\"",
        ),
    ];
    Ok((StatusCode::OK, headers, csv_bytes))
}

// ---
// Handler: the append-only transaction ledger for the caller's scope
// ---
pub async fn list_ledger(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ClinicQuery>,
) -> Result<impl IntoResponse, AppError> {
    let scope = user.resolve_view_scope(query.clinic.as_deref())?;
    let events = app_state.stock_service.ledger(&scope).await?;
    Ok((StatusCode::OK, Json(events)))
}
