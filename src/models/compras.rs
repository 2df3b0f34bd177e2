// src/models/compras.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::bancos::BancoId;
use crate::models::ventas::EstadoPago;

// --- 1. Orden de compra (lote) ---
// Cada orden es un lote del almacén: stock_actual baja con las ventas y
// nunca excede la cantidad recibida. (fecha, secuencia) es la clave de
// ordenamiento FIFO; secuencia desempata fechas idénticas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrdenCompra {
    pub id: Uuid,
    pub distribuidor_id: Uuid,
    pub producto: Option<String>,

    pub cantidad: Decimal,
    pub stock_actual: Decimal,
    pub stock_vendido: Decimal,

    #[schema(example = "60.00")]
    pub precio_unitario: Decimal,
    pub flete_unitario: Decimal,
    /// IVA como fracción (0.16 = 16%)
    pub iva_porcentaje: Decimal,
    pub total: Decimal,

    pub monto_pagado: Decimal,
    pub monto_restante: Decimal,
    pub estado_pago: EstadoPago,
    pub banco_origen: Option<BancoId>,
    pub numero_pagos: i32,

    pub fecha: DateTime<Utc>,
    pub secuencia: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Lote disponible ---
// Proyección mínima que el planificador FIFO necesita de cada lote con
// stock; las filas llegan ya ordenadas por (fecha, secuencia) y bloqueadas
// con FOR UPDATE dentro de la transacción de la venta.
#[derive(Debug, Clone, FromRow)]
pub struct LoteDisponible {
    pub id: Uuid,
    pub stock_actual: Decimal,
    pub precio_unitario: Decimal,
}

// --- 3. Pago a distribuidor ---
// Registro de solo-inserción, espejo del abono del lado de ventas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagoDistribuidor {
    pub id: Uuid,
    pub orden_compra_id: Uuid,
    pub distribuidor_id: Uuid,
    pub banco_origen_id: BancoId,

    pub monto: Decimal,
    pub monto_pagado_acumulado: Decimal,
    pub monto_restante_post_pago: Decimal,
    pub estado_pago_resultante: EstadoPago,

    pub concepto: Option<String>,
    pub referencia: Option<String>,
    pub fecha: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// --- 4. Resumen de almacén ---
// Vista agregada del stock: suma de lotes vivos valuada al costo de cada lote.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumenAlmacen {
    pub stock_actual: Decimal,
    pub valor_stock: Decimal,
    pub total_recibido: Decimal,
    pub total_vendido: Decimal,
    pub lotes_activos: i64,
}
