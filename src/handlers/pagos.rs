// src/handlers/pagos.rs

use axum::{extract::Path, extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::bancos::BancoId};

// ---
// Payload: Abono de cliente
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AbonoPayload {
    pub monto: Decimal,
    pub concepto: Option<String>,
}

// ---
// Handler: abonar_venta
// ---
#[utoipa::path(
    post,
    path = "/api/ventas/{venta_id}/abonos",
    tag = "Pagos",
    request_body = AbonoPayload,
    params(("venta_id" = Uuid, Path, description = "ID de la venta")),
    responses(
        (status = 201, description = "Abono aplicado con su reparto de capital"),
        (status = 404, description = "Venta no encontrada"),
        (status = 409, description = "Venta ya liquidada o abono excedente")
    )
)]
pub async fn abonar_venta(
    State(app_state): State<AppState>,
    Path(venta_id): Path<Uuid>,
    Json(payload): Json<AbonoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resultado = app_state
        .pagos_service
        .abonar_venta(&app_state.db_pool, venta_id, payload.monto, payload.concepto)
        .await?;

    Ok((StatusCode::CREATED, Json(resultado)))
}

// ---
// Payload: Pago a distribuidor
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagoOrdenPayload {
    pub monto: Decimal,
    pub banco_origen: BancoId,
    pub referencia: Option<String>,
    pub concepto: Option<String>,
}

// ---
// Handler: pagar_orden
// ---
#[utoipa::path(
    post,
    path = "/api/ordenes/{orden_id}/pagos",
    tag = "Pagos",
    request_body = PagoOrdenPayload,
    params(("orden_id" = Uuid, Path, description = "ID de la orden de compra")),
    responses(
        (status = 201, description = "Pago aplicado"),
        (status = 404, description = "Orden no encontrada"),
        (status = 409, description = "Orden liquidada, pago excedente o capital insuficiente")
    )
)]
pub async fn pagar_orden(
    State(app_state): State<AppState>,
    Path(orden_id): Path<Uuid>,
    Json(payload): Json<PagoOrdenPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resultado = app_state
        .pagos_service
        .pagar_orden(
            &app_state.db_pool,
            orden_id,
            payload.monto,
            payload.banco_origen,
            payload.referencia,
            payload.concepto,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(resultado)))
}
