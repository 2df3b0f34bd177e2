// src/models/ventas.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Estado de pago ---
// Compartido por ventas y órdenes de compra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_pago", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoPago {
    Pendiente,
    Parcial,
    Completo,
}

// --- 2. Trazabilidad de lotes ---
// Qué lote aportó cuántas unidades a la venta, en orden de consumo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoteOrigen {
    pub lote_id: Uuid,
    pub cantidad: Decimal,
    pub costo_unitario: Decimal,
}

// --- 3. Venta ---
// Los monto_* (distribución histórica) se fijan al crear la fila y siempre
// suman precio_total_venta; representan el 100% del valor económico aunque
// no se haya cobrado nada. Los capital_* solo reflejan efectivo recibido y
// crecen hacia los históricos con cada abono.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Venta {
    pub id: Uuid,
    pub cliente_id: Uuid,

    pub cantidad: Decimal,
    #[schema(example = "100.00")]
    pub precio_venta_unidad: Decimal,
    pub precio_compra_unidad: Decimal,
    pub precio_flete_unidad: Decimal,
    pub precio_total_venta: Decimal,

    // Distribución histórica (inmutable)
    pub monto_boveda_monte: Decimal,
    pub monto_fletes: Decimal,
    pub monto_utilidades: Decimal,

    // Capital ya respaldado por efectivo
    pub capital_boveda_monte: Decimal,
    pub capital_fletes: Decimal,
    pub capital_utilidades: Decimal,

    pub monto_pagado: Decimal,
    pub monto_restante: Decimal,
    pub estado_pago: EstadoPago,

    #[schema(value_type = Vec<LoteOrigen>)]
    pub origen_lotes: Json<Vec<LoteOrigen>>,

    pub numero_abonos: i32,
    pub metodo_pago: Option<String>,
    pub observaciones: Option<String>,

    pub fecha: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 4. Abono ---
// Registro de solo-inserción. Lleva la foto posterior al pago para que la
// bitácora sea auditable sin reconstruir la venta.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Abono {
    pub id: Uuid,
    pub venta_id: Uuid,
    pub cliente_id: Uuid,

    pub monto: Decimal,
    /// Proporción del total que representa este abono (0..=1)
    pub proporcion: Decimal,

    // Capital que este abono libera en cada bóveda
    pub monto_boveda_monte: Decimal,
    pub monto_fletes: Decimal,
    pub monto_utilidades: Decimal,

    pub monto_pagado_acumulado: Decimal,
    pub monto_restante_post_abono: Decimal,
    pub estado_pago_resultante: EstadoPago,

    pub concepto: Option<String>,
    pub fecha: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
