// src/db/distribuidores_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::common::texto::normalizar_nombre;
use crate::models::distribuidores::Distribuidor;

#[derive(Clone)]
pub struct DistribuidoresRepository {
    pool: PgPool,
}

impl DistribuidoresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Distribuidor>, AppError> {
        let distribuidores =
            sqlx::query_as::<_, Distribuidor>("SELECT * FROM distribuidores ORDER BY nombre ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(distribuidores)
    }

    pub async fn obtener<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Distribuidor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let distribuidor =
            sqlx::query_as::<_, Distribuidor>("SELECT * FROM distribuidores WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(distribuidor)
    }

    pub async fn buscar_por_nombre<'e, E>(
        &self,
        executor: E,
        nombre: &str,
    ) -> Result<Option<Distribuidor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let distribuidor = sqlx::query_as::<_, Distribuidor>(
            "SELECT * FROM distribuidores WHERE nombre_normalizado = $1",
        )
        .bind(normalizar_nombre(nombre))
        .fetch_optional(executor)
        .await?;
        Ok(distribuidor)
    }

    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nombre: &str,
        telefono: Option<&str>,
        email: Option<&str>,
    ) -> Result<Distribuidor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let distribuidor = sqlx::query_as::<_, Distribuidor>(
            r#"
            INSERT INTO distribuidores (id, nombre, nombre_normalizado, telefono, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nombre.trim())
        .bind(normalizar_nombre(nombre))
        .bind(telefono)
        .bind(email)
        .fetch_one(executor)
        .await?;
        Ok(distribuidor)
    }

    /// Efecto de una orden nueva: sube lo que le debemos y el volumen
    /// histórico del proveedor.
    pub async fn aplicar_orden<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        total: Decimal,
        pagado_inicial: Decimal,
        fecha: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE distribuidores
            SET saldo_pendiente = saldo_pendiente + $2 - $3,
                total_ordenes_compra = total_ordenes_compra + $2,
                total_pagado = total_pagado + $3,
                numero_ordenes = numero_ordenes + 1,
                numero_pagos = numero_pagos + CASE WHEN $3 > 0 THEN 1 ELSE 0 END,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(total)
        .bind(pagado_inicial)
        .bind(fecha)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn aplicar_pago<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        monto: Decimal,
        fecha: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE distribuidores
            SET saldo_pendiente = saldo_pendiente - $2,
                total_pagado = total_pagado + $2,
                numero_pagos = numero_pagos + 1,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(monto)
        .bind(fecha)
        .execute(executor)
        .await?;
        Ok(())
    }
}
