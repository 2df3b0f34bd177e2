// src/db/ventas_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::ventas::{Abono, EstadoPago, LoteOrigen, Venta};
use crate::services::distribucion::{CapitalLiberado, DistribucionVenta};

/// Datos para insertar una venta ya calculada por el servicio.
#[derive(Debug, Clone)]
pub struct NuevaVenta {
    pub cliente_id: Uuid,
    pub cantidad: Decimal,
    pub precio_venta_unidad: Decimal,
    pub precio_compra_unidad: Decimal,
    pub precio_flete_unidad: Decimal,
    pub distribucion: DistribucionVenta,
    pub capital_inicial: CapitalLiberado,
    pub monto_pagado: Decimal,
    pub estado_pago: EstadoPago,
    pub origen_lotes: Vec<LoteOrigen>,
    pub metodo_pago: Option<String>,
    pub observaciones: Option<String>,
    pub fecha: DateTime<Utc>,
}

/// Datos para el registro inmutable de un abono.
#[derive(Debug, Clone)]
pub struct NuevoAbono {
    pub venta_id: Uuid,
    pub cliente_id: Uuid,
    pub monto: Decimal,
    pub proporcion: Decimal,
    pub capital: CapitalLiberado,
    pub monto_pagado_acumulado: Decimal,
    pub monto_restante_post_abono: Decimal,
    pub estado_pago_resultante: EstadoPago,
    pub concepto: Option<String>,
    pub fecha: DateTime<Utc>,
}

#[derive(Clone)]
pub struct VentasRepository {
    pool: PgPool,
}

impl VentasRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Venta>, AppError> {
        let ventas = sqlx::query_as::<_, Venta>("SELECT * FROM ventas ORDER BY fecha DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(ventas)
    }

    pub async fn listar_abonos(&self, venta_id: Uuid) -> Result<Vec<Abono>, AppError> {
        let abonos = sqlx::query_as::<_, Abono>(
            "SELECT * FROM abonos WHERE venta_id = $1 ORDER BY fecha ASC",
        )
        .bind(venta_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(abonos)
    }

    /// Lee la venta bloqueando su fila; los abonos recalculan estado y
    /// capital sobre esta lectura, nunca sobre datos viejos.
    pub async fn obtener_para_actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Venta>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let venta = sqlx::query_as::<_, Venta>("SELECT * FROM ventas WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(venta)
    }

    pub async fn crear<'e, E>(&self, executor: E, venta: NuevaVenta) -> Result<Venta, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let monto_restante = venta.distribucion.precio_total_venta - venta.monto_pagado;
        let creada = sqlx::query_as::<_, Venta>(
            r#"
            INSERT INTO ventas (
                id, cliente_id, cantidad,
                precio_venta_unidad, precio_compra_unidad, precio_flete_unidad,
                precio_total_venta,
                monto_boveda_monte, monto_fletes, monto_utilidades,
                capital_boveda_monte, capital_fletes, capital_utilidades,
                monto_pagado, monto_restante, estado_pago,
                origen_lotes, numero_abonos, metodo_pago, observaciones, fecha
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(venta.cliente_id)
        .bind(venta.cantidad)
        .bind(venta.precio_venta_unidad)
        .bind(venta.precio_compra_unidad)
        .bind(venta.precio_flete_unidad)
        .bind(venta.distribucion.precio_total_venta)
        .bind(venta.distribucion.monto_boveda_monte)
        .bind(venta.distribucion.monto_fletes)
        .bind(venta.distribucion.monto_utilidades)
        .bind(venta.capital_inicial.boveda_monte)
        .bind(venta.capital_inicial.fletes)
        .bind(venta.capital_inicial.utilidades)
        .bind(venta.monto_pagado)
        .bind(monto_restante)
        .bind(venta.estado_pago)
        .bind(Json(venta.origen_lotes))
        .bind(if venta.monto_pagado > Decimal::ZERO { 1_i32 } else { 0 })
        .bind(&venta.metodo_pago)
        .bind(&venta.observaciones)
        .bind(venta.fecha)
        .fetch_one(executor)
        .await?;
        Ok(creada)
    }

    /// Aplica un abono sobre el agregado de la venta. Solo toca montos
    /// pagados, capital y estado; la distribución histórica (monto_*)
    /// queda fuera del SET deliberadamente.
    pub async fn aplicar_abono<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        monto: Decimal,
        capital: &CapitalLiberado,
        nuevo_estado: EstadoPago,
        fecha: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE ventas
            SET monto_pagado = monto_pagado + $2,
                monto_restante = monto_restante - $2,
                capital_boveda_monte = capital_boveda_monte + $3,
                capital_fletes = capital_fletes + $4,
                capital_utilidades = capital_utilidades + $5,
                estado_pago = $6,
                numero_abonos = numero_abonos + 1,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(monto)
        .bind(capital.boveda_monte)
        .bind(capital.fletes)
        .bind(capital.utilidades)
        .bind(nuevo_estado)
        .bind(fecha)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn insertar_abono<'e, E>(
        &self,
        executor: E,
        abono: NuevoAbono,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO abonos (
                id, venta_id, cliente_id, monto, proporcion,
                monto_boveda_monte, monto_fletes, monto_utilidades,
                monto_pagado_acumulado, monto_restante_post_abono,
                estado_pago_resultante, concepto, fecha
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(id)
        .bind(abono.venta_id)
        .bind(abono.cliente_id)
        .bind(abono.monto)
        .bind(abono.proporcion)
        .bind(abono.capital.boveda_monte)
        .bind(abono.capital.fletes)
        .bind(abono.capital.utilidades)
        .bind(abono.monto_pagado_acumulado)
        .bind(abono.monto_restante_post_abono)
        .bind(abono.estado_pago_resultante)
        .bind(&abono.concepto)
        .bind(abono.fecha)
        .execute(executor)
        .await?;
        Ok(id)
    }
}
