// src/services/pagos_service.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Acquire, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::notify::{NotificadorVistas, VistaInvalidada},
    common::texto::id_corto,
    db::compras_repo::NuevoPago,
    db::movimientos_repo::NuevoMovimiento,
    db::ventas_repo::NuevoAbono,
    db::{BancosRepository, ClientesRepository, ComprasRepository, DistribuidoresRepository,
        MovimientosRepository, VentasRepository},
    models::bancos::{BancoId, TipoMovimiento},
    models::ventas::EstadoPago,
    services::distribucion::{calcular_abono, derivar_estado_pago, CapitalLiberado,
        DistribucionVenta},
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoAbono {
    pub abono_id: Uuid,
    pub venta_id: Uuid,
    pub estado_pago: EstadoPago,
    pub monto_pagado: Decimal,
    pub monto_restante: Decimal,
    /// Capital liberado en cada bóveda por este abono
    pub capital_distribuido: CapitalLiberado,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoPagoOrden {
    pub pago_id: Uuid,
    pub orden_id: Uuid,
    pub estado_pago: EstadoPago,
    pub monto_pagado: Decimal,
    pub monto_restante: Decimal,
}

#[derive(Clone)]
pub struct PagosService {
    ventas_repo: VentasRepository,
    compras_repo: ComprasRepository,
    clientes_repo: ClientesRepository,
    distribuidores_repo: DistribuidoresRepository,
    bancos_repo: BancosRepository,
    movimientos_repo: MovimientosRepository,
    notificador: NotificadorVistas,
}

impl PagosService {
    pub fn new(
        ventas_repo: VentasRepository,
        compras_repo: ComprasRepository,
        clientes_repo: ClientesRepository,
        distribuidores_repo: DistribuidoresRepository,
        bancos_repo: BancosRepository,
        movimientos_repo: MovimientosRepository,
        notificador: NotificadorVistas,
    ) -> Self {
        Self {
            ventas_repo,
            compras_repo,
            clientes_repo,
            distribuidores_repo,
            bancos_repo,
            movimientos_repo,
            notificador,
        }
    }

    /// Abono de un cliente contra una venta. Las precondiciones se
    /// verifican sobre la fila bloqueada, nunca sobre una lectura vieja:
    /// la venta no debe estar liquidada y el monto no puede exceder lo
    /// restante. El reparto escala la distribución histórica; el abono de
    /// cierre liquida por resta, sin residuo de redondeo.
    pub async fn abonar_venta<'a, A>(
        &self,
        conn: A,
        venta_id: Uuid,
        monto: Decimal,
        concepto: Option<String>,
    ) -> Result<ResultadoAbono, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        if monto <= Decimal::ZERO {
            return Err(AppError::MontoInvalido);
        }

        let mut tx = conn.begin().await?;
        let ahora = chrono::Utc::now();

        let venta = self
            .ventas_repo
            .obtener_para_actualizar(&mut *tx, venta_id)
            .await?
            .ok_or(AppError::NoEncontrado)?;

        if venta.estado_pago == EstadoPago::Completo {
            return Err(AppError::YaLiquidada);
        }
        if monto > venta.monto_restante {
            return Err(AppError::AbonoExcedente);
        }

        let historico = DistribucionVenta {
            monto_boveda_monte: venta.monto_boveda_monte,
            monto_fletes: venta.monto_fletes,
            monto_utilidades: venta.monto_utilidades,
            precio_total_venta: venta.precio_total_venta,
        };
        let liberado = CapitalLiberado {
            boveda_monte: venta.capital_boveda_monte,
            fletes: venta.capital_fletes,
            utilidades: venta.capital_utilidades,
        };
        let capital = calcular_abono(&historico, &liberado, monto, venta.monto_restante);

        let nuevo_pagado = venta.monto_pagado + monto;
        let nuevo_estado = derivar_estado_pago(nuevo_pagado, venta.precio_total_venta);

        // Una utilidad negativa cobrada retira capital de la bóveda.
        let montos_capital = [capital.boveda_monte, capital.fletes, capital.utilidades];
        for (banco, delta) in BancoId::DISTRIBUCION_VENTAS.iter().zip(montos_capital) {
            if delta < Decimal::ZERO {
                let fila = self.bancos_repo.obtener_para_actualizar(&mut *tx, *banco).await?;
                if fila.capital_actual + delta < Decimal::ZERO {
                    return Err(AppError::CapitalInsuficiente { banco: *banco });
                }
            }
        }

        self.ventas_repo
            .aplicar_abono(&mut *tx, venta.id, monto, &capital, nuevo_estado, ahora)
            .await?;
        self.clientes_repo
            .aplicar_abono(&mut *tx, venta.cliente_id, monto, ahora)
            .await?;

        let abono_id = self
            .ventas_repo
            .insertar_abono(
                &mut *tx,
                NuevoAbono {
                    venta_id: venta.id,
                    cliente_id: venta.cliente_id,
                    monto,
                    proporcion: (monto / venta.precio_total_venta).round_dp(6),
                    capital,
                    monto_pagado_acumulado: nuevo_pagado,
                    monto_restante_post_abono: venta.monto_restante - monto,
                    estado_pago_resultante: nuevo_estado,
                    concepto,
                    fecha: ahora,
                },
            )
            .await?;

        for (banco, delta) in BancoId::DISTRIBUCION_VENTAS.iter().zip(montos_capital) {
            self.bancos_repo
                .acreditar(&mut *tx, *banco, delta, Decimal::ZERO)
                .await?;

            let mut mov = NuevoMovimiento::simple(
                *banco,
                TipoMovimiento::Abono,
                delta,
                format!("Abono venta #{}", id_corto(&venta.id)),
                ahora,
            );
            mov.categoria = Some("Cobranza".into());
            mov.referencia_id = Some(abono_id);
            mov.referencia_tipo = Some("abono".into());
            self.movimientos_repo.insertar(&mut *tx, mov).await?;
        }

        tx.commit().await?;
        self.notificador.notificar(VistaInvalidada::Ventas);

        tracing::info!(
            abono_id = %abono_id,
            venta_id = %venta.id,
            monto = %monto,
            "abono registrado"
        );

        Ok(ResultadoAbono {
            abono_id,
            venta_id: venta.id,
            estado_pago: nuevo_estado,
            monto_pagado: nuevo_pagado,
            monto_restante: venta.monto_restante - monto,
            capital_distribuido: capital,
        })
    }

    /// Pago nuestro contra una orden de compra: mismas precondiciones que
    /// el abono, más la verificación de capital de la bóveda de origen.
    pub async fn pagar_orden<'a, A>(
        &self,
        conn: A,
        orden_id: Uuid,
        monto: Decimal,
        banco_origen: BancoId,
        referencia: Option<String>,
        concepto: Option<String>,
    ) -> Result<ResultadoPagoOrden, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        if monto <= Decimal::ZERO {
            return Err(AppError::MontoInvalido);
        }

        let mut tx = conn.begin().await?;
        let ahora = chrono::Utc::now();

        let orden = self
            .compras_repo
            .obtener_para_actualizar(&mut *tx, orden_id)
            .await?
            .ok_or(AppError::NoEncontrado)?;

        if orden.estado_pago == EstadoPago::Completo {
            return Err(AppError::YaLiquidada);
        }
        if monto > orden.monto_restante {
            return Err(AppError::AbonoExcedente);
        }

        let banco = self
            .bancos_repo
            .obtener_para_actualizar(&mut *tx, banco_origen)
            .await?;
        if banco.capital_actual < monto {
            return Err(AppError::CapitalInsuficiente { banco: banco_origen });
        }

        let nuevo_pagado = orden.monto_pagado + monto;
        let nuevo_estado = derivar_estado_pago(nuevo_pagado, orden.total);

        self.bancos_repo.debitar(&mut *tx, banco_origen, monto).await?;
        self.compras_repo
            .aplicar_pago(&mut *tx, orden.id, monto, nuevo_estado, ahora)
            .await?;
        self.distribuidores_repo
            .aplicar_pago(&mut *tx, orden.distribuidor_id, monto, ahora)
            .await?;

        let pago_id = self
            .compras_repo
            .insertar_pago(
                &mut *tx,
                NuevoPago {
                    orden_compra_id: orden.id,
                    distribuidor_id: orden.distribuidor_id,
                    banco_origen_id: banco_origen,
                    monto,
                    monto_pagado_acumulado: nuevo_pagado,
                    monto_restante_post_pago: orden.monto_restante - monto,
                    estado_pago_resultante: nuevo_estado,
                    concepto,
                    referencia,
                    fecha: ahora,
                },
            )
            .await?;

        let mut mov = NuevoMovimiento::simple(
            banco_origen,
            TipoMovimiento::Pago,
            monto,
            format!("Pago OC #{}", id_corto(&orden.id)),
            ahora,
        );
        mov.categoria = Some("Pagos Distribuidores".into());
        mov.referencia_id = Some(pago_id);
        mov.referencia_tipo = Some("pago_distribuidor".into());
        self.movimientos_repo.insertar(&mut *tx, mov).await?;

        tx.commit().await?;
        self.notificador.notificar(VistaInvalidada::Compras);

        tracing::info!(
            pago_id = %pago_id,
            orden_id = %orden.id,
            monto = %monto,
            "pago a distribuidor registrado"
        );

        Ok(ResultadoPagoOrden {
            pago_id,
            orden_id: orden.id,
            estado_pago: nuevo_estado,
            monto_pagado: nuevo_pagado,
            monto_restante: orden.monto_restante - monto,
        })
    }
}
