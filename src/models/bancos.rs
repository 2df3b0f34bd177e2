// src/models/bancos.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Identidad de las bóvedas ---
// Conjunto cerrado: las filas se siembran en la migración inicial y nunca
// se crean en tiempo de ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "banco_id", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BancoId {
    BovedaMonte,
    BovedaUsa,
    FleteSur,
    Utilidades,
    Profit,
    Leftie,
    Azteca,
}

impl BancoId {
    /// Los tres bancos que reciben la distribución de una venta:
    /// costo, flete y utilidad, en ese orden.
    pub const DISTRIBUCION_VENTAS: [BancoId; 3] =
        [BancoId::BovedaMonte, BancoId::FleteSur, BancoId::Utilidades];

    pub fn nombre(&self) -> &'static str {
        match self {
            BancoId::BovedaMonte => "Bóveda Monte",
            BancoId::BovedaUsa => "Bóveda USA",
            BancoId::FleteSur => "Flete Sur",
            BancoId::Utilidades => "Utilidades",
            BancoId::Profit => "Profit",
            BancoId::Leftie => "Leftie",
            BancoId::Azteca => "Azteca",
        }
    }
}

impl std::fmt::Display for BancoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.nombre())
    }
}

// --- 2. Bóveda ---
// capital_actual es el saldo gastable; los históricos solo crecen.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Banco {
    pub id: BancoId,
    pub nombre: String,

    #[schema(example = "15000.00")]
    pub capital_actual: Decimal,
    pub historico_ingresos: Decimal,
    pub historico_gastos: Decimal,
    pub historico_transferencias_entrada: Decimal,
    pub historico_transferencias_salida: Decimal,

    pub updated_at: DateTime<Utc>,
}

// --- 3. Movimientos (bitácora de capital) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_movimiento", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TipoMovimiento {
    Ingreso,
    Gasto,
    Pago,
    Abono,
    Distribucion,
    TransferenciaEntrada,
    TransferenciaSalida,
}

// Registro de solo-inserción: nada lo actualiza ni lo borra.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movimiento {
    pub id: Uuid,
    pub banco_id: BancoId,
    pub tipo: TipoMovimiento,
    pub monto: Decimal,
    pub concepto: String,
    pub categoria: Option<String>,

    // Venta, orden o pago que originó el movimiento
    pub referencia_id: Option<Uuid>,
    pub referencia_tipo: Option<String>,

    // En transferencias, cada pata guarda la otra
    pub banco_origen_id: Option<BancoId>,
    pub banco_destino_id: Option<BancoId>,
    pub movimiento_vinculado: Option<Uuid>,

    pub fecha: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
