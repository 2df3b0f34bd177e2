// src/db/clientes_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::common::texto::normalizar_nombre;
use crate::models::clientes::Cliente;

#[derive(Clone)]
pub struct ClientesRepository {
    pool: PgPool,
}

impl ClientesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Cliente>, AppError> {
        let clientes =
            sqlx::query_as::<_, Cliente>("SELECT * FROM clientes ORDER BY nombre ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(clientes)
    }

    pub async fn obtener<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(cliente)
    }

    /// Búsqueda en dos pasos: primero por nombre normalizado; el alta
    /// condicional la decide el servicio.
    pub async fn buscar_por_nombre<'e, E>(
        &self,
        executor: E,
        nombre: &str,
    ) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            "SELECT * FROM clientes WHERE nombre_normalizado = $1",
        )
        .bind(normalizar_nombre(nombre))
        .fetch_optional(executor)
        .await?;
        Ok(cliente)
    }

    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nombre: &str,
        telefono: Option<&str>,
        email: Option<&str>,
    ) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (id, nombre, nombre_normalizado, telefono, email)
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
        Ok(cliente)
    }

    /// Efecto de una venta sobre el cliente: sube la deuda por lo no
    /// cobrado y los totales de por vida. Incrementos relativos siempre.
    pub async fn aplicar_venta<'e, E>(
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
            UPDATE clientes
            SET saldo_pendiente = saldo_pendiente + $2 - $3,
                total_compras = total_compras + $2,
                total_pagado = total_pagado + $3,
                numero_ventas = numero_ventas + 1,
                numero_abonos = numero_abonos + CASE WHEN $3 > 0 THEN 1 ELSE 0 END,
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

    pub async fn aplicar_abono<'e, E>(
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
            UPDATE clientes
            SET saldo_pendiente = saldo_pendiente - $2,
                total_pagado = total_pagado + $2,
                numero_abonos = numero_abonos + 1,
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
