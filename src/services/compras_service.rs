// src/services/compras_service.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Acquire, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::notify::{NotificadorVistas, VistaInvalidada},
    common::texto::id_corto,
    db::compras_repo::{NuevaOrden, NuevoPago},
    db::movimientos_repo::NuevoMovimiento,
    db::{BancosRepository, ComprasRepository, DistribuidoresRepository, MovimientosRepository},
    models::bancos::{BancoId, TipoMovimiento},
    models::distribuidores::Distribuidor,
    models::ventas::EstadoPago,
    services::distribucion::{calcular_total_orden, derivar_estado_pago},
};

#[derive(Debug, Clone)]
pub struct NuevaOrdenInput {
    pub distribuidor_id: Option<Uuid>,
    pub distribuidor_nombre: Option<String>,
    pub distribuidor_telefono: Option<String>,
    pub distribuidor_email: Option<String>,
    pub producto: Option<String>,
    pub cantidad: Decimal,
    pub precio_unitario: Decimal,
    pub flete_unitario: Decimal,
    pub iva_porcentaje: Decimal,
    pub pago_inicial: Decimal,
    pub banco_origen: Option<BancoId>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoOrden {
    pub orden_id: Uuid,
    pub distribuidor_id: Uuid,
    pub total: Decimal,
    pub estado_pago: EstadoPago,
    pub monto_pagado: Decimal,
    pub monto_restante: Decimal,
}

#[derive(Clone)]
pub struct ComprasService {
    compras_repo: ComprasRepository,
    distribuidores_repo: DistribuidoresRepository,
    bancos_repo: BancosRepository,
    movimientos_repo: MovimientosRepository,
    notificador: NotificadorVistas,
}

impl ComprasService {
    pub fn new(
        compras_repo: ComprasRepository,
        distribuidores_repo: DistribuidoresRepository,
        bancos_repo: BancosRepository,
        movimientos_repo: MovimientosRepository,
        notificador: NotificadorVistas,
    ) -> Self {
        Self {
            compras_repo,
            distribuidores_repo,
            bancos_repo,
            movimientos_repo,
            notificador,
        }
    }

    /// Alta de una orden de compra: distribuidor, lote nuevo con todo su
    /// stock, deuda del distribuidor y, si hubo pago inicial, débito de la
    /// bóveda de origen. Una sola transacción.
    pub async fn crear_orden<'a, A>(
        &self,
        conn: A,
        input: NuevaOrdenInput,
    ) -> Result<ResultadoOrden, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        if input.cantidad <= Decimal::ZERO {
            return Err(AppError::CantidadInvalida);
        }
        if input.precio_unitario <= Decimal::ZERO
            || input.flete_unitario < Decimal::ZERO
            || input.iva_porcentaje < Decimal::ZERO
        {
            return Err(AppError::PrecioInvalido);
        }
        if input.pago_inicial < Decimal::ZERO {
            return Err(AppError::MontoInvalido);
        }
        if input.pago_inicial > Decimal::ZERO && input.banco_origen.is_none() {
            return Err(AppError::BancoOrigenRequerido);
        }

        let total = calcular_total_orden(
            input.precio_unitario,
            input.flete_unitario,
            input.cantidad,
            input.iva_porcentaje,
        );
        let pago_inicial = input.pago_inicial.min(total);
        let estado_pago = derivar_estado_pago(pago_inicial, total);

        let mut tx = conn.begin().await?;
        let ahora = chrono::Utc::now();

        // 1. Resolver o crear el distribuidor
        let distribuidor = self.resolver_distribuidor(&mut tx, &input).await?;

        // 2. Alta del lote: nace con stock_actual = cantidad
        let orden = self
            .compras_repo
            .crear_orden(
                &mut *tx,
                NuevaOrden {
                    distribuidor_id: distribuidor.id,
                    producto: input.producto.clone(),
                    cantidad: input.cantidad,
                    precio_unitario: input.precio_unitario,
                    flete_unitario: input.flete_unitario,
                    iva_porcentaje: input.iva_porcentaje,
                    total,
                    monto_pagado: pago_inicial,
                    estado_pago,
                    banco_origen: input.banco_origen,
                    fecha: ahora,
                },
            )
            .await?;

        // 3. Deuda y volumen del distribuidor
        self.distribuidores_repo
            .aplicar_orden(&mut *tx, distribuidor.id, total, pago_inicial, ahora)
            .await?;

        // 4. Pago inicial: se revalida el capital bajo FOR UPDATE antes
        //    de debitar, dentro de la misma transacción.
        if pago_inicial > Decimal::ZERO {
            let banco = input.banco_origen.ok_or(AppError::BancoOrigenRequerido)?;
            let fila = self.bancos_repo.obtener_para_actualizar(&mut *tx, banco).await?;
            if fila.capital_actual < pago_inicial {
                return Err(AppError::CapitalInsuficiente { banco });
            }
            self.bancos_repo.debitar(&mut *tx, banco, pago_inicial).await?;

            let pago_id = self
                .compras_repo
                .insertar_pago(
                    &mut *tx,
                    NuevoPago {
                        orden_compra_id: orden.id,
                        distribuidor_id: distribuidor.id,
                        banco_origen_id: banco,
                        monto: pago_inicial,
                        monto_pagado_acumulado: pago_inicial,
                        monto_restante_post_pago: total - pago_inicial,
                        estado_pago_resultante: estado_pago,
                        concepto: Some("Pago inicial".into()),
                        referencia: None,
                        fecha: ahora,
                    },
                )
                .await?;

            let mut mov = NuevoMovimiento::simple(
                banco,
                TipoMovimiento::Pago,
                pago_inicial,
                format!("Pago OC #{}", id_corto(&orden.id)),
                ahora,
            );
            mov.categoria = Some("Pagos Distribuidores".into());
            mov.referencia_id = Some(pago_id);
            mov.referencia_tipo = Some("pago_distribuidor".into());
            self.movimientos_repo.insertar(&mut *tx, mov).await?;
        }

        tx.commit().await?;
        self.notificador.notificar(VistaInvalidada::Compras);

        tracing::info!(
            orden_id = %orden.id,
            distribuidor_id = %distribuidor.id,
            total = %total,
            "orden de compra creada"
        );

        Ok(ResultadoOrden {
            orden_id: orden.id,
            distribuidor_id: distribuidor.id,
            total,
            estado_pago,
            monto_pagado: pago_inicial,
            monto_restante: total - pago_inicial,
        })
    }

    async fn resolver_distribuidor(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        input: &NuevaOrdenInput,
    ) -> Result<Distribuidor, AppError> {
        if let Some(id) = input.distribuidor_id {
            return self
                .distribuidores_repo
                .obtener(&mut **tx, id)
                .await?
                .ok_or(AppError::NoEncontrado);
        }

        let nombre = input
            .distribuidor_nombre
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(AppError::DistribuidorNoResuelto)?;

        match self.distribuidores_repo.buscar_por_nombre(&mut **tx, nombre).await? {
            Some(distribuidor) => Ok(distribuidor),
            None => {
                self.distribuidores_repo
                    .crear(
                        &mut **tx,
                        nombre,
                        input.distribuidor_telefono.as_deref(),
                        input.distribuidor_email.as_deref(),
                    )
                    .await
            }
        }
    }
}
