// src/db/compras_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::bancos::BancoId;
use crate::models::compras::{LoteDisponible, OrdenCompra, PagoDistribuidor, ResumenAlmacen};
use crate::models::ventas::EstadoPago;

/// Datos para insertar una orden de compra calculada por el servicio.
#[derive(Debug, Clone)]
pub struct NuevaOrden {
    pub distribuidor_id: Uuid,
    pub producto: Option<String>,
    pub cantidad: Decimal,
    pub precio_unitario: Decimal,
    pub flete_unitario: Decimal,
    pub iva_porcentaje: Decimal,
    pub total: Decimal,
    pub monto_pagado: Decimal,
    pub estado_pago: EstadoPago,
    pub banco_origen: Option<BancoId>,
    pub fecha: DateTime<Utc>,
}

/// Datos para el registro inmutable de un pago a distribuidor.
#[derive(Debug, Clone)]
pub struct NuevoPago {
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
}

#[derive(Clone)]
pub struct ComprasRepository {
    pool: PgPool,
}

impl ComprasRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<OrdenCompra>, AppError> {
        let ordenes =
            sqlx::query_as::<_, OrdenCompra>("SELECT * FROM ordenes_compra ORDER BY fecha DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(ordenes)
    }

    pub async fn listar_pagos(&self, orden_id: Uuid) -> Result<Vec<PagoDistribuidor>, AppError> {
        let pagos = sqlx::query_as::<_, PagoDistribuidor>(
            "SELECT * FROM pagos_distribuidor WHERE orden_compra_id = $1 ORDER BY fecha ASC",
        )
        .bind(orden_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(pagos)
    }

    pub async fn resumen_almacen(&self) -> Result<ResumenAlmacen, AppError> {
        let resumen = sqlx::query_as::<_, ResumenAlmacen>(
            r#"
            SELECT
                COALESCE(SUM(stock_actual), 0) AS stock_actual,
                COALESCE(SUM(stock_actual * precio_unitario), 0) AS valor_stock,
                COALESCE(SUM(cantidad), 0) AS total_recibido,
                COALESCE(SUM(stock_vendido), 0) AS total_vendido,
                COUNT(*) FILTER (WHERE stock_actual > 0) AS lotes_activos
            FROM ordenes_compra
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(resumen)
    }

    pub async fn crear_orden<'e, E>(
        &self,
        executor: E,
        orden: NuevaOrden,
    ) -> Result<OrdenCompra, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let monto_restante = orden.total - orden.monto_pagado;
        let creada = sqlx::query_as::<_, OrdenCompra>(
            r#"
            INSERT INTO ordenes_compra (
                id, distribuidor_id, producto,
                cantidad, stock_actual, stock_vendido,
                precio_unitario, flete_unitario, iva_porcentaje, total,
                monto_pagado, monto_restante, estado_pago, banco_origen,
                numero_pagos, fecha
            )
            VALUES (
                $1, $2, $3, $4, $4, 0, $5, $6, $7, $8,
                $9, $10, $11, $12, $13, $14
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(orden.distribuidor_id)
        .bind(&orden.producto)
        .bind(orden.cantidad)
        .bind(orden.precio_unitario)
        .bind(orden.flete_unitario)
        .bind(orden.iva_porcentaje)
        .bind(orden.total)
        .bind(orden.monto_pagado)
        .bind(monto_restante)
        .bind(orden.estado_pago)
        .bind(orden.banco_origen)
        .bind(if orden.monto_pagado > Decimal::ZERO { 1_i32 } else { 0 })
        .bind(orden.fecha)
        .fetch_one(executor)
        .await?;
        Ok(creada)
    }

    pub async fn obtener_para_actualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<OrdenCompra>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orden =
            sqlx::query_as::<_, OrdenCompra>("SELECT * FROM ordenes_compra WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(orden)
    }

    /// Lotes con stock, en orden FIFO (fecha y, a igual fecha, secuencia de
    /// inserción), bloqueados hasta que la transacción de la venta termine.
    pub async fn lotes_disponibles<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<LoteDisponible>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lotes = sqlx::query_as::<_, LoteDisponible>(
            r#"
            SELECT id, stock_actual, precio_unitario
            FROM ordenes_compra
            WHERE stock_actual > 0
            ORDER BY fecha ASC, secuencia ASC
            FOR UPDATE
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(lotes)
    }

    /// Lotes puntuales para una asignación manual, también bajo FOR UPDATE.
    pub async fn lotes_por_ids<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<LoteDisponible>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lotes = sqlx::query_as::<_, LoteDisponible>(
            r#"
            SELECT id, stock_actual, precio_unitario
            FROM ordenes_compra
            WHERE id = ANY($1)
            FOR UPDATE
            "#,
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(lotes)
    }

    /// Descuenta stock de un lote. El WHERE vuelve a validar el stock en el
    /// mismo statement: si otra transacción lo consumió primero, afecta
    /// cero filas y el llamador aborta con StockInsuficiente.
    pub async fn descontar_stock<'e, E>(
        &self,
        executor: E,
        lote_id: Uuid,
        cantidad: Decimal,
        fecha: DateTime<Utc>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query(
            r#"
            UPDATE ordenes_compra
            SET stock_actual = stock_actual - $2,
                stock_vendido = stock_vendido + $2,
                updated_at = $3
            WHERE id = $1 AND stock_actual >= $2
            "#,
        )
        .bind(lote_id)
        .bind(cantidad)
        .bind(fecha)
        .execute(executor)
        .await?;
        Ok(resultado.rows_affected())
    }

    /// Aplica un pago sobre el agregado de la orden.
    pub async fn aplicar_pago<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        monto: Decimal,
        nuevo_estado: EstadoPago,
        fecha: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE ordenes_compra
            SET monto_pagado = monto_pagado + $2,
                monto_restante = monto_restante - $2,
                estado_pago = $3,
                numero_pagos = numero_pagos + 1,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(monto)
        .bind(nuevo_estado)
        .bind(fecha)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn insertar_pago<'e, E>(
        &self,
        executor: E,
        pago: NuevoPago,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO pagos_distribuidor (
                id, orden_compra_id, distribuidor_id, banco_origen_id,
                monto, monto_pagado_acumulado, monto_restante_post_pago,
                estado_pago_resultante, concepto, referencia, fecha
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id)
        .bind(pago.orden_compra_id)
        .bind(pago.distribuidor_id)
        .bind(pago.banco_origen_id)
        .bind(pago.monto)
        .bind(pago.monto_pagado_acumulado)
        .bind(pago.monto_restante_post_pago)
        .bind(pago.estado_pago_resultante)
        .bind(&pago.concepto)
        .bind(&pago.referencia)
        .bind(pago.fecha)
        .execute(executor)
        .await?;
        Ok(id)
    }
}
