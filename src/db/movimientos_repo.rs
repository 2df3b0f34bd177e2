// src/db/movimientos_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::bancos::{BancoId, Movimiento, TipoMovimiento};

/// Datos para insertar un movimiento. El id lo genera el repositorio.
#[derive(Debug, Clone)]
pub struct NuevoMovimiento {
    pub banco_id: BancoId,
    pub tipo: TipoMovimiento,
    pub monto: Decimal,
    pub concepto: String,
    pub categoria: Option<String>,
    pub referencia_id: Option<Uuid>,
    pub referencia_tipo: Option<String>,
    pub banco_origen_id: Option<BancoId>,
    pub banco_destino_id: Option<BancoId>,
    pub movimiento_vinculado: Option<Uuid>,
    pub fecha: DateTime<Utc>,
}

impl NuevoMovimiento {
    /// Movimiento simple sin referencias cruzadas.
    pub fn simple(
        banco_id: BancoId,
        tipo: TipoMovimiento,
        monto: Decimal,
        concepto: String,
        fecha: DateTime<Utc>,
    ) -> Self {
        Self {
            banco_id,
            tipo,
            monto,
            concepto,
            categoria: None,
            referencia_id: None,
            referencia_tipo: None,
            banco_origen_id: None,
            banco_destino_id: None,
            movimiento_vinculado: None,
            fecha,
        }
    }
}

#[derive(Clone)]
pub struct MovimientosRepository {
    pool: PgPool,
}

impl MovimientosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(
        &self,
        banco: Option<BancoId>,
        limite: i64,
    ) -> Result<Vec<Movimiento>, AppError> {
        let movimientos = sqlx::query_as::<_, Movimiento>(
            r#"
            SELECT * FROM movimientos
            WHERE ($1::banco_id IS NULL OR banco_id = $1)
            ORDER BY fecha DESC
            LIMIT $2
            "#,
        )
        .bind(banco)
        .bind(limite)
        .fetch_all(&self.pool)
        .await?;
        Ok(movimientos)
    }

    /// Inserta en la bitácora y devuelve el id generado. La tabla es de
    /// solo-inserción: no existe update ni delete en este repositorio.
    pub async fn insertar<'e, E>(
        &self,
        executor: E,
        mov: NuevoMovimiento,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = Uuid::new_v4();
        self.insertar_con_id(executor, id, mov).await?;
        Ok(id)
    }

    /// Variante con id provisto por el llamador; la usan las transferencias
    /// para que cada pata conozca el id de la otra antes de insertar.
    pub async fn insertar_con_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mov: NuevoMovimiento,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO movimientos (
                id, banco_id, tipo, monto, concepto, categoria,
                referencia_id, referencia_tipo,
                banco_origen_id, banco_destino_id, movimiento_vinculado, fecha
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(id)
        .bind(mov.banco_id)
        .bind(mov.tipo)
        .bind(mov.monto)
        .bind(&mov.concepto)
        .bind(&mov.categoria)
        .bind(mov.referencia_id)
        .bind(&mov.referencia_tipo)
        .bind(mov.banco_origen_id)
        .bind(mov.banco_destino_id)
        .bind(mov.movimiento_vinculado)
        .bind(mov.fecha)
        .execute(executor)
        .await?;
        Ok(())
    }
}
