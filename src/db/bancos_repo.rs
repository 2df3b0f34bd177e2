// src/db/bancos_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::common::error::AppError;
use crate::models::bancos::{Banco, BancoId};

#[derive(Clone)]
pub struct BancosRepository {
    pool: PgPool,
}

impl BancosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Lecturas (usan la pool directamente)
    // ---

    pub async fn listar(&self) -> Result<Vec<Banco>, AppError> {
        let bancos = sqlx::query_as::<_, Banco>("SELECT * FROM bancos ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(bancos)
    }

    // ---
    // Escrituras (transaccionales, reciben el executor de la transacción)
    // ---

    /// Lee la bóveda bloqueando su fila. Toda verificación de capital debe
    /// hacerse sobre esta lectura, dentro de la misma transacción que luego
    /// aplica el débito.
    pub async fn obtener_para_actualizar<'e, E>(
        &self,
        executor: E,
        id: BancoId,
    ) -> Result<Banco, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let banco = sqlx::query_as::<_, Banco>("SELECT * FROM bancos WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(banco)
    }

    /// Abona capital y/o histórico. Siempre por incremento relativo; el
    /// histórico de una venta se acredita completo aunque el capital llegue
    /// después con los abonos. Un monto histórico negativo (venta a
    /// pérdida) se registra en historico_gastos, de modo que ambos
    /// acumulados siguen siendo monótonos.
    pub async fn acreditar<'e, E>(
        &self,
        executor: E,
        id: BancoId,
        capital: Decimal,
        historico: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE bancos
            SET capital_actual = capital_actual + $2,
                historico_ingresos = historico_ingresos + GREATEST($3, 0),
                historico_gastos = historico_gastos + GREATEST(-$3, 0),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(capital)
        .bind(historico)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Débito por gasto o pago. El llamador ya verificó el capital bajo
    /// FOR UPDATE; aquí solo se aplica el delta.
    pub async fn debitar<'e, E>(
        &self,
        executor: E,
        id: BancoId,
        monto: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE bancos
            SET capital_actual = capital_actual - $2,
                historico_gastos = historico_gastos + $2,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(monto)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn aplicar_transferencia_salida<'e, E>(
        &self,
        executor: E,
        id: BancoId,
        monto: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE bancos
            SET capital_actual = capital_actual - $2,
                historico_transferencias_salida = historico_transferencias_salida + $2,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(monto)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn aplicar_transferencia_entrada<'e, E>(
        &self,
        executor: E,
        id: BancoId,
        monto: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE bancos
            SET capital_actual = capital_actual + $2,
                historico_transferencias_entrada = historico_transferencias_entrada + $2,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(monto)
        .execute(executor)
        .await?;
        Ok(())
    }
}
