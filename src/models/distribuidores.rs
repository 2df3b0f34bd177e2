// src/models/distribuidores.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// El espejo del cliente en el lado de compras: saldo_pendiente es lo que
// le debemos nosotros por órdenes aún no liquidadas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Distribuidor {
    pub id: Uuid,

    #[schema(example = "Importadora del Norte")]
    pub nombre: String,
    pub nombre_normalizado: String,
    pub telefono: Option<String>,
    pub email: Option<String>,

    pub saldo_pendiente: Decimal,
    pub total_ordenes_compra: Decimal,
    pub total_pagado: Decimal,
    pub numero_ordenes: i32,
    pub numero_pagos: i32,

    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
