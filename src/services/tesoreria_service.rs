// src/services/tesoreria_service.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Acquire, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::notify::{NotificadorVistas, VistaInvalidada},
    db::movimientos_repo::NuevoMovimiento,
    db::{BancosRepository, MovimientosRepository},
    models::bancos::{BancoId, TipoMovimiento},
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoTransferencia {
    pub movimiento_salida_id: Uuid,
    pub movimiento_entrada_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoMovimiento {
    pub movimiento_id: Uuid,
}

// Movimientos de capital que no pasan por ventas ni compras:
// transferencias entre bóvedas, gastos externos e ingresos directos.
#[derive(Clone)]
pub struct TesoreriaService {
    bancos_repo: BancosRepository,
    movimientos_repo: MovimientosRepository,
    notificador: NotificadorVistas,
}

impl TesoreriaService {
    pub fn new(
        bancos_repo: BancosRepository,
        movimientos_repo: MovimientosRepository,
        notificador: NotificadorVistas,
    ) -> Self {
        Self {
            bancos_repo,
            movimientos_repo,
            notificador,
        }
    }

    /// Mueve capital entre dos bóvedas y deja dos movimientos enlazados,
    /// cada pata con el id de la otra.
    pub async fn transferir<'a, A>(
        &self,
        conn: A,
        origen: BancoId,
        destino: BancoId,
        monto: Decimal,
        concepto: Option<String>,
    ) -> Result<ResultadoTransferencia, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        if origen == destino {
            return Err(AppError::TransferenciaInvalida);
        }
        if monto <= Decimal::ZERO {
            return Err(AppError::MontoInvalido);
        }

        let mut tx = conn.begin().await?;
        let ahora = chrono::Utc::now();

        let banco_origen = self.bancos_repo.obtener_para_actualizar(&mut *tx, origen).await?;
        if banco_origen.capital_actual < monto {
            return Err(AppError::CapitalInsuficiente { banco: origen });
        }

        self.bancos_repo
            .aplicar_transferencia_salida(&mut *tx, origen, monto)
            .await?;
        self.bancos_repo
            .aplicar_transferencia_entrada(&mut *tx, destino, monto)
            .await?;

        // Los ids se generan antes para que cada pata referencie a la otra.
        let salida_id = Uuid::new_v4();
        let entrada_id = Uuid::new_v4();
        let concepto = concepto.unwrap_or_else(|| "Transferencia entre bóvedas".into());

        let mut salida = NuevoMovimiento::simple(
            origen,
            TipoMovimiento::TransferenciaSalida,
            monto,
            format!("Transferencia a {}: {}", destino, concepto),
            ahora,
        );
        salida.categoria = Some("Transferencias".into());
        salida.banco_origen_id = Some(origen);
        salida.banco_destino_id = Some(destino);
        salida.movimiento_vinculado = Some(entrada_id);
        self.movimientos_repo
            .insertar_con_id(&mut *tx, salida_id, salida)
            .await?;

        let mut entrada = NuevoMovimiento::simple(
            destino,
            TipoMovimiento::TransferenciaEntrada,
            monto,
            format!("Transferencia desde {}: {}", origen, concepto),
            ahora,
        );
        entrada.categoria = Some("Transferencias".into());
        entrada.banco_origen_id = Some(origen);
        entrada.banco_destino_id = Some(destino);
        entrada.movimiento_vinculado = Some(salida_id);
        self.movimientos_repo
            .insertar_con_id(&mut *tx, entrada_id, entrada)
            .await?;

        tx.commit().await?;
        self.notificador.notificar(VistaInvalidada::Bancos);

        tracing::info!(%origen, %destino, %monto, "transferencia realizada");

        Ok(ResultadoTransferencia {
            movimiento_salida_id: salida_id,
            movimiento_entrada_id: entrada_id,
        })
    }

    /// Gasto externo: débito de la bóveda con verificación de capital.
    pub async fn registrar_gasto<'a, A>(
        &self,
        conn: A,
        banco: BancoId,
        monto: Decimal,
        concepto: String,
    ) -> Result<ResultadoMovimiento, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        if monto <= Decimal::ZERO {
            return Err(AppError::MontoInvalido);
        }

        let mut tx = conn.begin().await?;
        let ahora = chrono::Utc::now();

        let fila = self.bancos_repo.obtener_para_actualizar(&mut *tx, banco).await?;
        if fila.capital_actual < monto {
            return Err(AppError::CapitalInsuficiente { banco });
        }

        self.bancos_repo.debitar(&mut *tx, banco, monto).await?;

        let mut mov = NuevoMovimiento::simple(banco, TipoMovimiento::Gasto, monto, concepto, ahora);
        mov.categoria = Some("Gastos".into());
        let movimiento_id = self.movimientos_repo.insertar(&mut *tx, mov).await?;

        tx.commit().await?;
        self.notificador.notificar(VistaInvalidada::Bancos);

        tracing::info!(%banco, %monto, "gasto registrado");

        Ok(ResultadoMovimiento { movimiento_id })
    }

    /// Ingreso directo a una bóveda, fuera del circuito de ventas.
    pub async fn registrar_ingreso<'a, A>(
        &self,
        conn: A,
        banco: BancoId,
        monto: Decimal,
        concepto: String,
    ) -> Result<ResultadoMovimiento, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        if monto <= Decimal::ZERO {
            return Err(AppError::MontoInvalido);
        }

        let mut tx = conn.begin().await?;
        let ahora = chrono::Utc::now();

        self.bancos_repo.acreditar(&mut *tx, banco, monto, monto).await?;

        let mut mov =
            NuevoMovimiento::simple(banco, TipoMovimiento::Ingreso, monto, concepto, ahora);
        mov.categoria = Some("Ingresos".into());
        let movimiento_id = self.movimientos_repo.insertar(&mut *tx, mov).await?;

        tx.commit().await?;
        self.notificador.notificar(VistaInvalidada::Bancos);

        tracing::info!(%banco, %monto, "ingreso registrado");

        Ok(ResultadoMovimiento { movimiento_id })
    }
}
