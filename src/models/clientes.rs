// src/models/clientes.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Se crea perezosamente en la primera venta que lo nombra; nunca se borra.
// saldo_pendiente = lo que nos debe; los totales son de por vida.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: Uuid,

    #[schema(example = "Juan Pérez")]
    pub nombre: String,
    pub nombre_normalizado: String,
    pub telefono: Option<String>,
    pub email: Option<String>,

    #[schema(example = "600.00")]
    pub saldo_pendiente: Decimal,
    pub total_compras: Decimal,
    pub total_pagado: Decimal,
    pub numero_ventas: i32,
    pub numero_abonos: i32,

    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
