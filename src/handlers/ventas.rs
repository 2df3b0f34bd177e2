// src/handlers/ventas.rs

use axum::{extract::Path, extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    services::ventas_service::{AsignacionManual, NuevaVentaInput},
};

// ---
// Payload: CrearVenta
// ---
// La referencia al cliente admite id o nombre; los montos los valida el
// servicio antes de abrir la transacción (cantidad/precio/monto inválidos).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearVentaPayload {
    pub cliente_id: Option<Uuid>,

    #[validate(length(min = 1, message = "El nombre del cliente no puede estar vacío."))]
    pub cliente_nombre: Option<String>,
    pub cliente_telefono: Option<String>,
    pub cliente_email: Option<String>,

    pub cantidad: Decimal,
    pub precio_venta_unidad: Decimal,
    pub precio_compra_unidad: Decimal,

    /// Flete por unidad; si se omite aplica el flete por defecto.
    pub precio_flete_unidad: Option<Decimal>,

    #[serde(default)]
    pub monto_pagado_inicial: Decimal,

    /// Asignación explícita de lotes; si se omite se reserva por FIFO.
    pub asignacion_lotes: Option<Vec<AsignacionManual>>,

    pub metodo_pago: Option<String>,
    pub observaciones: Option<String>,
}

// ---
// Handler: crear_venta
// ---
#[utoipa::path(
    post,
    path = "/api/ventas",
    tag = "Ventas",
    request_body = CrearVentaPayload,
    responses(
        (status = 201, description = "Venta creada con su distribución histórica"),
        (status = 409, description = "Stock insuficiente"),
        (status = 422, description = "Cliente no resuelto o datos inválidos")
    )
)]
pub async fn crear_venta(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearVentaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resultado = app_state
        .ventas_service
        .crear_venta(
            &app_state.db_pool,
            NuevaVentaInput {
                cliente_id: payload.cliente_id,
                cliente_nombre: payload.cliente_nombre,
                cliente_telefono: payload.cliente_telefono,
                cliente_email: payload.cliente_email,
                cantidad: payload.cantidad,
                precio_venta_unidad: payload.precio_venta_unidad,
                precio_compra_unidad: payload.precio_compra_unidad,
                precio_flete_unidad: payload.precio_flete_unidad,
                monto_pagado_inicial: payload.monto_pagado_inicial,
                asignacion_lotes: payload.asignacion_lotes,
                metodo_pago: payload.metodo_pago,
                observaciones: payload.observaciones,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(resultado)))
}

// ---
// Handler: listar_ventas
// ---
#[utoipa::path(
    get,
    path = "/api/ventas",
    tag = "Ventas",
    responses((status = 200, description = "Todas las ventas, más recientes primero"))
)]
pub async fn listar_ventas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let ventas = app_state.ventas_repo.listar().await?;
    Ok((StatusCode::OK, Json(ventas)))
}

// ---
// Handler: listar_abonos
// ---
#[utoipa::path(
    get,
    path = "/api/ventas/{venta_id}/abonos",
    tag = "Ventas",
    params(("venta_id" = Uuid, Path, description = "ID de la venta")),
    responses((status = 200, description = "Abonos de la venta en orden cronológico"))
)]
pub async fn listar_abonos(
    State(app_state): State<AppState>,
    Path(venta_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let abonos = app_state.ventas_repo.listar_abonos(venta_id).await?;
    Ok((StatusCode::OK, Json(abonos)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn payload_minimo_con_defaults() {
        let payload: CrearVentaPayload = serde_json::from_str(
            r#"{
                "clienteNombre": "Juan Pérez",
                "cantidad": 10,
                "precioVentaUnidad": 100,
                "precioCompraUnidad": 60
            }"#,
        )
        .unwrap();

        assert_eq!(payload.cantidad, dec!(10));
        assert_eq!(payload.monto_pagado_inicial, Decimal::ZERO);
        assert!(payload.precio_flete_unidad.is_none());
        assert!(payload.asignacion_lotes.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn nombre_vacio_no_pasa_la_validacion() {
        let payload: CrearVentaPayload = serde_json::from_str(
            r#"{
                "clienteNombre": "",
                "cantidad": 1,
                "precioVentaUnidad": 100,
                "precioCompraUnidad": 60
            }"#,
        )
        .unwrap();

        assert!(payload.validate().is_err());
    }
}
