// src/services/ventas_service.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::notify::{NotificadorVistas, VistaInvalidada},
    common::texto::id_corto,
    db::movimientos_repo::NuevoMovimiento,
    db::ventas_repo::{NuevaVenta, NuevoAbono},
    db::{BancosRepository, ClientesRepository, ComprasRepository, MovimientosRepository,
        VentasRepository},
    models::bancos::{BancoId, TipoMovimiento},
    models::clientes::Cliente,
    models::ventas::{EstadoPago, LoteOrigen},
    services::distribucion::{
        calcular_abono, calcular_distribucion_venta, derivar_estado_pago, planificar_fifo,
        CapitalLiberado, DistribucionVenta, FLETE_DEFAULT,
    },
};

/// Asignación de lote provista por el llamador, que puentea el FIFO.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsignacionManual {
    pub lote_id: Uuid,
    pub cantidad: Decimal,
}

#[derive(Debug, Clone)]
pub struct NuevaVentaInput {
    pub cliente_id: Option<Uuid>,
    pub cliente_nombre: Option<String>,
    pub cliente_telefono: Option<String>,
    pub cliente_email: Option<String>,
    pub cantidad: Decimal,
    pub precio_venta_unidad: Decimal,
    pub precio_compra_unidad: Decimal,
    pub precio_flete_unidad: Option<Decimal>,
    pub monto_pagado_inicial: Decimal,
    pub asignacion_lotes: Option<Vec<AsignacionManual>>,
    pub metodo_pago: Option<String>,
    pub observaciones: Option<String>,
}

/// Lo que el llamador necesita para la pantalla de confirmación.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoVenta {
    pub venta_id: Uuid,
    pub cliente_id: Uuid,
    pub distribucion: DistribucionVenta,
    pub estado_pago: EstadoPago,
    pub monto_pagado: Decimal,
    pub monto_restante: Decimal,
    pub origen_lotes: Vec<LoteOrigen>,
}

#[derive(Clone)]
pub struct VentasService {
    ventas_repo: VentasRepository,
    compras_repo: ComprasRepository,
    clientes_repo: ClientesRepository,
    bancos_repo: BancosRepository,
    movimientos_repo: MovimientosRepository,
    notificador: NotificadorVistas,
}

impl VentasService {
    pub fn new(
        ventas_repo: VentasRepository,
        compras_repo: ComprasRepository,
        clientes_repo: ClientesRepository,
        bancos_repo: BancosRepository,
        movimientos_repo: MovimientosRepository,
        notificador: NotificadorVistas,
    ) -> Self {
        Self {
            ventas_repo,
            compras_repo,
            clientes_repo,
            bancos_repo,
            movimientos_repo,
            notificador,
        }
    }

    /// Procesa una venta de punta a punta dentro de una sola transacción:
    /// cliente, reserva de lotes, distribución histórica, alta de la venta,
    /// descuento de stock, saldo del cliente y — si hubo pago inicial —
    /// crédito de capital a las tres bóvedas con su abono y movimientos.
    /// Cualquier falla deshace todo; no queda ningún efecto parcial.
    pub async fn crear_venta<'a, A>(
        &self,
        conn: A,
        input: NuevaVentaInput,
    ) -> Result<ResultadoVenta, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        // Validación previa: nada se escribe con datos inválidos.
        if input.cantidad <= Decimal::ZERO {
            return Err(AppError::CantidadInvalida);
        }
        if input.precio_venta_unidad <= Decimal::ZERO || input.precio_compra_unidad < Decimal::ZERO
        {
            return Err(AppError::PrecioInvalido);
        }
        let precio_flete = input.precio_flete_unidad.unwrap_or(FLETE_DEFAULT);
        if precio_flete < Decimal::ZERO {
            return Err(AppError::PrecioInvalido);
        }
        if input.monto_pagado_inicial < Decimal::ZERO {
            return Err(AppError::MontoInvalido);
        }

        let distribucion = calcular_distribucion_venta(
            input.precio_venta_unidad,
            input.precio_compra_unidad,
            precio_flete,
            input.cantidad,
        );
        let total = distribucion.precio_total_venta;
        // Un pago inicial mayor al total solo liquida la venta; el resto
        // no entra al libro.
        let pagado_inicial = input.monto_pagado_inicial.min(total);
        let estado_pago = derivar_estado_pago(pagado_inicial, total);
        let capital_inicial = if pagado_inicial > Decimal::ZERO {
            calcular_abono(&distribucion, &CapitalLiberado::CERO, pagado_inicial, total)
        } else {
            CapitalLiberado::CERO
        };

        let mut tx = conn.begin().await?;
        let ahora = chrono::Utc::now();

        // 1. Resolver o crear el cliente
        let cliente = self.resolver_cliente(&mut tx, &input).await?;

        // 2. Reservar lotes: asignación explícita del llamador o FIFO.
        //    En ambos casos las filas quedan bloqueadas hasta el commit.
        let plan = match &input.asignacion_lotes {
            Some(manual) => self.validar_asignacion_manual(&mut tx, manual, input.cantidad).await?,
            None => {
                let lotes = self.compras_repo.lotes_disponibles(&mut *tx).await?;
                planificar_fifo(&lotes, input.cantidad)?
            }
        };

        // 3. Alta de la venta con su distribución histórica inmutable
        let venta = self
            .ventas_repo
            .crear(
                &mut *tx,
                NuevaVenta {
                    cliente_id: cliente.id,
                    cantidad: input.cantidad,
                    precio_venta_unidad: input.precio_venta_unidad,
                    precio_compra_unidad: input.precio_compra_unidad,
                    precio_flete_unidad: precio_flete,
                    distribucion,
                    capital_inicial,
                    monto_pagado: pagado_inicial,
                    estado_pago,
                    origen_lotes: plan.clone(),
                    metodo_pago: input.metodo_pago.clone(),
                    observaciones: input.observaciones.clone(),
                    fecha: ahora,
                },
            )
            .await?;

        // 4. Descontar los lotes consumidos. El UPDATE revalida el stock:
        //    si otra venta ganó la carrera, afecta cero filas y abortamos.
        for asignacion in &plan {
            let filas = self
                .compras_repo
                .descontar_stock(&mut *tx, asignacion.lote_id, asignacion.cantidad, ahora)
                .await?;
            if filas == 0 {
                return Err(AppError::StockInsuficiente {
                    faltante: asignacion.cantidad,
                });
            }
        }

        // 5. Saldo y totales del cliente
        self.clientes_repo
            .aplicar_venta(&mut *tx, cliente.id, total, pagado_inicial, ahora)
            .await?;

        // 6. Bóvedas: el histórico se acredita completo al vender; el
        //    capital solo en proporción a lo cobrado.
        let montos_historicos = [
            distribucion.monto_boveda_monte,
            distribucion.monto_fletes,
            distribucion.monto_utilidades,
        ];
        let montos_capital = [
            capital_inicial.boveda_monte,
            capital_inicial.fletes,
            capital_inicial.utilidades,
        ];

        // Una utilidad negativa cobrada retira capital: verificamos que la
        // bóveda lo soporte antes de aplicar el débito.
        for (banco, capital) in BancoId::DISTRIBUCION_VENTAS.iter().zip(montos_capital) {
            if capital < Decimal::ZERO {
                let fila = self.bancos_repo.obtener_para_actualizar(&mut *tx, *banco).await?;
                if fila.capital_actual + capital < Decimal::ZERO {
                    return Err(AppError::CapitalInsuficiente { banco: *banco });
                }
            }
        }

        for ((banco, historico), capital) in BancoId::DISTRIBUCION_VENTAS
            .iter()
            .zip(montos_historicos)
            .zip(montos_capital)
        {
            self.bancos_repo.acreditar(&mut *tx, *banco, capital, historico).await?;

            let mut mov = NuevoMovimiento::simple(
                *banco,
                TipoMovimiento::Distribucion,
                historico,
                format!("Distribución venta #{}", id_corto(&venta.id)),
                ahora,
            );
            mov.categoria = Some("Ventas".into());
            mov.referencia_id = Some(venta.id);
            mov.referencia_tipo = Some("venta".into());
            self.movimientos_repo.insertar(&mut *tx, mov).await?;
        }

        // 7. Pago inicial: abono inmutable + movimientos de cobranza
        if pagado_inicial > Decimal::ZERO {
            let abono_id = self
                .ventas_repo
                .insertar_abono(
                    &mut *tx,
                    NuevoAbono {
                        venta_id: venta.id,
                        cliente_id: cliente.id,
                        monto: pagado_inicial,
                        proporcion: (pagado_inicial / total).round_dp(6),
                        capital: capital_inicial,
                        monto_pagado_acumulado: pagado_inicial,
                        monto_restante_post_abono: total - pagado_inicial,
                        estado_pago_resultante: estado_pago,
                        concepto: Some("Pago inicial".into()),
                        fecha: ahora,
                    },
                )
                .await?;

            for (banco, capital) in BancoId::DISTRIBUCION_VENTAS.iter().zip(montos_capital) {
                let mut mov = NuevoMovimiento::simple(
                    *banco,
                    TipoMovimiento::Abono,
                    capital,
                    format!("Abono venta #{}", id_corto(&venta.id)),
                    ahora,
                );
                mov.categoria = Some("Cobranza".into());
                mov.referencia_id = Some(abono_id);
                mov.referencia_tipo = Some("abono".into());
                self.movimientos_repo.insertar(&mut *tx, mov).await?;
            }
        }

        tx.commit().await?;
        self.notificador.notificar(VistaInvalidada::Ventas);

        tracing::info!(
            venta_id = %venta.id,
            cliente_id = %cliente.id,
            total = %total,
            "venta creada con distribución"
        );

        Ok(ResultadoVenta {
            venta_id: venta.id,
            cliente_id: cliente.id,
            distribucion,
            estado_pago,
            monto_pagado: pagado_inicial,
            monto_restante: total - pagado_inicial,
            origen_lotes: plan,
        })
    }

    /// Resolución en dos pasos: por id, o por nombre normalizado con alta
    /// condicional. Sin id ni nombre, la venta no puede atribuirse a nadie.
    async fn resolver_cliente(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        input: &NuevaVentaInput,
    ) -> Result<Cliente, AppError> {
        if let Some(id) = input.cliente_id {
            return self
                .clientes_repo
                .obtener(&mut **tx, id)
                .await?
                .ok_or(AppError::NoEncontrado);
        }

        let nombre = input
            .cliente_nombre
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(AppError::ClienteNoResuelto)?;

        match self.clientes_repo.buscar_por_nombre(&mut **tx, nombre).await? {
            Some(cliente) => Ok(cliente),
            None => {
                self.clientes_repo
                    .crear(
                        &mut **tx,
                        nombre,
                        input.cliente_telefono.as_deref(),
                        input.cliente_email.as_deref(),
                    )
                    .await
            }
        }
    }

    /// Una asignación explícita se honra tal cual llegó, pero primero se
    /// verifica contra los lotes reales bajo FOR UPDATE: existencia,
    /// stock suficiente y que las cantidades sumen lo vendido.
    async fn validar_asignacion_manual(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        manual: &[AsignacionManual],
        cantidad: Decimal,
    ) -> Result<Vec<LoteOrigen>, AppError> {
        let suma: Decimal = manual.iter().map(|a| a.cantidad).sum();
        if suma != cantidad || manual.iter().any(|a| a.cantidad <= Decimal::ZERO) {
            return Err(AppError::CantidadInvalida);
        }

        let ids: Vec<Uuid> = manual.iter().map(|a| a.lote_id).collect();
        let filas = self.compras_repo.lotes_por_ids(&mut **tx, &ids).await?;
        let por_id: std::collections::HashMap<Uuid, _> =
            filas.into_iter().map(|l| (l.id, l)).collect();

        let mut plan = Vec::with_capacity(manual.len());
        for asignacion in manual {
            let lote = por_id.get(&asignacion.lote_id).ok_or(AppError::NoEncontrado)?;
            if lote.stock_actual < asignacion.cantidad {
                return Err(AppError::StockInsuficiente {
                    faltante: asignacion.cantidad - lote.stock_actual,
                });
            }
            plan.push(LoteOrigen {
                lote_id: asignacion.lote_id,
                cantidad: asignacion.cantidad,
                costo_unitario: lote.precio_unitario,
            });
        }
        Ok(plan)
    }
}
