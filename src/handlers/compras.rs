// src/handlers/compras.rs

use axum::{extract::Path, extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::bancos::BancoId,
    services::compras_service::NuevaOrdenInput,
};

// ---
// Payload: CrearOrden
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearOrdenPayload {
    pub distribuidor_id: Option<Uuid>,

    #[validate(length(min = 1, message = "El nombre del distribuidor no puede estar vacío."))]
    pub distribuidor_nombre: Option<String>,
    pub distribuidor_telefono: Option<String>,
    pub distribuidor_email: Option<String>,

    pub producto: Option<String>,
    pub cantidad: Decimal,
    pub precio_unitario: Decimal,

    #[serde(default)]
    pub flete_unitario: Decimal,

    /// IVA como fracción (0.16 = 16%)
    #[serde(default)]
    pub iva_porcentaje: Decimal,

    #[serde(default)]
    pub pago_inicial: Decimal,

    /// Obligatorio cuando hay pago inicial
    pub banco_origen: Option<BancoId>,
}

// ---
// Handler: crear_orden
// ---
#[utoipa::path(
    post,
    path = "/api/ordenes",
    tag = "Compras",
    request_body = CrearOrdenPayload,
    responses(
        (status = 201, description = "Orden creada; el lote entra al almacén completo"),
        (status = 409, description = "Capital insuficiente en la bóveda de origen"),
        (status = 422, description = "Distribuidor no resuelto o datos inválidos")
    )
)]
pub async fn crear_orden(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearOrdenPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resultado = app_state
        .compras_service
        .crear_orden(
            &app_state.db_pool,
            NuevaOrdenInput {
                distribuidor_id: payload.distribuidor_id,
                distribuidor_nombre: payload.distribuidor_nombre,
                distribuidor_telefono: payload.distribuidor_telefono,
                distribuidor_email: payload.distribuidor_email,
                producto: payload.producto,
                cantidad: payload.cantidad,
                precio_unitario: payload.precio_unitario,
                flete_unitario: payload.flete_unitario,
                iva_porcentaje: payload.iva_porcentaje,
                pago_inicial: payload.pago_inicial,
                banco_origen: payload.banco_origen,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(resultado)))
}

// ---
// Handler: listar_ordenes
// ---
#[utoipa::path(
    get,
    path = "/api/ordenes",
    tag = "Compras",
    responses((status = 200, description = "Todas las órdenes de compra"))
)]
pub async fn listar_ordenes(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let ordenes = app_state.compras_repo.listar().await?;
    Ok((StatusCode::OK, Json(ordenes)))
}

// ---
// Handler: listar_pagos
// ---
#[utoipa::path(
    get,
    path = "/api/ordenes/{orden_id}/pagos",
    tag = "Compras",
    params(("orden_id" = Uuid, Path, description = "ID de la orden de compra")),
    responses((status = 200, description = "Pagos de la orden en orden cronológico"))
)]
pub async fn listar_pagos(
    State(app_state): State<AppState>,
    Path(orden_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pagos = app_state.compras_repo.listar_pagos(orden_id).await?;
    Ok((StatusCode::OK, Json(pagos)))
}
