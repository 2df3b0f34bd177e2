// src/handlers/tesoreria.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::bancos::BancoId};

// ---
// Payload: Transferencia
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferenciaPayload {
    pub banco_origen: BancoId,
    pub banco_destino: BancoId,
    pub monto: Decimal,
    pub concepto: Option<String>,
}

// ---
// Handler: transferir
// ---
#[utoipa::path(
    post,
    path = "/api/transferencias",
    tag = "Tesorería",
    request_body = TransferenciaPayload,
    responses(
        (status = 201, description = "Transferencia aplicada; devuelve ambas patas"),
        (status = 409, description = "Capital insuficiente en la bóveda de origen"),
        (status = 422, description = "Origen y destino iguales")
    )
)]
pub async fn transferir(
    State(app_state): State<AppState>,
    Json(payload): Json<TransferenciaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resultado = app_state
        .tesoreria_service
        .transferir(
            &app_state.db_pool,
            payload.banco_origen,
            payload.banco_destino,
            payload.monto,
            payload.concepto,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(resultado)))
}

// ---
// Payload: Gasto / Ingreso
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GastoPayload {
    pub banco: BancoId,
    pub monto: Decimal,

    #[validate(length(min = 1, message = "El concepto es obligatorio."))]
    pub concepto: String,
}

// ---
// Handler: registrar_gasto
// ---
#[utoipa::path(
    post,
    path = "/api/gastos",
    tag = "Tesorería",
    request_body = GastoPayload,
    responses(
        (status = 201, description = "Gasto aplicado"),
        (status = 409, description = "Capital insuficiente")
    )
)]
pub async fn registrar_gasto(
    State(app_state): State<AppState>,
    Json(payload): Json<GastoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resultado = app_state
        .tesoreria_service
        .registrar_gasto(&app_state.db_pool, payload.banco, payload.monto, payload.concepto)
        .await?;

    Ok((StatusCode::CREATED, Json(resultado)))
}

// ---
// Handler: registrar_ingreso
// ---
#[utoipa::path(
    post,
    path = "/api/ingresos",
    tag = "Tesorería",
    request_body = GastoPayload,
    responses((status = 201, description = "Ingreso aplicado"))
)]
pub async fn registrar_ingreso(
    State(app_state): State<AppState>,
    Json(payload): Json<GastoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resultado = app_state
        .tesoreria_service
        .registrar_ingreso(&app_state.db_pool, payload.banco, payload.monto, payload.concepto)
        .await?;

    Ok((StatusCode::CREATED, Json(resultado)))
}
