// src/services/distribucion.rs

// Funciones puras de cálculo financiero. Todo monto es Decimal; los únicos
// redondeos ocurren en los repartos proporcionales y el abono de cierre
// liquida por resta del remanente, nunca por proporción.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::AppError;
use crate::models::compras::LoteDisponible;
use crate::models::ventas::{EstadoPago, LoteOrigen};

/// Flete por unidad cuando la venta no especifica uno.
pub const FLETE_DEFAULT: Decimal = dec!(500);

// ---
// Distribución de una venta
// ---

/// Reparto histórico de una venta entre las tres bóvedas.
/// Invariante: monto_boveda_monte + monto_fletes + monto_utilidades
/// == precio_total_venta, exacto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistribucionVenta {
    /// Costo: precio_compra × cantidad → Bóveda Monte
    pub monto_boveda_monte: Decimal,
    /// Transporte: precio_flete × cantidad → Flete Sur
    pub monto_fletes: Decimal,
    /// Ganancia neta → Utilidades. Puede ser negativa: una venta a
    /// pérdida se registra tal cual, no se recorta ni se rechaza.
    pub monto_utilidades: Decimal,
    /// Lo que paga el cliente: precio_venta × cantidad
    pub precio_total_venta: Decimal,
}

pub fn calcular_distribucion_venta(
    precio_venta: Decimal,
    precio_compra: Decimal,
    precio_flete: Decimal,
    cantidad: Decimal,
) -> DistribucionVenta {
    let precio_total_venta = precio_venta * cantidad;
    let monto_boveda_monte = precio_compra * cantidad;
    let monto_fletes = precio_flete * cantidad;
    // La utilidad sale por resta para que la suma cierre exacta.
    let monto_utilidades = precio_total_venta - monto_boveda_monte - monto_fletes;

    DistribucionVenta {
        monto_boveda_monte,
        monto_fletes,
        monto_utilidades,
        precio_total_venta,
    }
}

// ---
// Reparto proporcional de un abono
// ---

/// Capital ya liberado (o por liberar) en cada una de las tres bóvedas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapitalLiberado {
    pub boveda_monte: Decimal,
    pub fletes: Decimal,
    pub utilidades: Decimal,
}

impl CapitalLiberado {
    pub const CERO: CapitalLiberado = CapitalLiberado {
        boveda_monte: Decimal::ZERO,
        fletes: Decimal::ZERO,
        utilidades: Decimal::ZERO,
    };

    pub fn total(&self) -> Decimal {
        self.boveda_monte + self.fletes + self.utilidades
    }
}

/// Capital que un abono libera en cada bóveda.
///
/// El abono que liquida la venta (monto == monto_restante) cierra por
/// resta: cada bóveda recibe exactamente lo que le falta para alcanzar su
/// monto histórico. Así la suma de todos los abonos reproduce la
/// distribución histórica sin residuo de redondeo. Los abonos intermedios
/// reparten por proporción, redondeada a centavos.
pub fn calcular_abono(
    historico: &DistribucionVenta,
    capital_liberado: &CapitalLiberado,
    monto: Decimal,
    monto_restante: Decimal,
) -> CapitalLiberado {
    if monto >= monto_restante {
        return CapitalLiberado {
            boveda_monte: historico.monto_boveda_monte - capital_liberado.boveda_monte,
            fletes: historico.monto_fletes - capital_liberado.fletes,
            utilidades: historico.monto_utilidades - capital_liberado.utilidades,
        };
    }

    let proporcion = monto / historico.precio_total_venta;
    CapitalLiberado {
        boveda_monte: (historico.monto_boveda_monte * proporcion).round_dp(2),
        fletes: (historico.monto_fletes * proporcion).round_dp(2),
        utilidades: (historico.monto_utilidades * proporcion).round_dp(2),
    }
}

// ---
// Estados y totales
// ---

pub fn derivar_estado_pago(pagado: Decimal, total: Decimal) -> EstadoPago {
    if pagado >= total {
        EstadoPago::Completo
    } else if pagado > Decimal::ZERO {
        EstadoPago::Parcial
    } else {
        EstadoPago::Pendiente
    }
}

/// Total de una orden de compra: (costo + flete) × cantidad × (1 + IVA).
pub fn calcular_total_orden(
    precio_unitario: Decimal,
    flete_unitario: Decimal,
    cantidad: Decimal,
    iva_porcentaje: Decimal,
) -> Decimal {
    ((precio_unitario + flete_unitario) * cantidad * (Decimal::ONE + iva_porcentaje)).round_dp(2)
}

// ---
// Planificación FIFO
// ---

/// Asigna lotes para cubrir `cantidad`, consumiendo primero los más
/// antiguos. Los lotes llegan ya ordenados por (fecha, secuencia); esta
/// función no muta nada: devuelve el plan o falla sin tocar ningún lote.
pub fn planificar_fifo(
    lotes: &[LoteDisponible],
    cantidad: Decimal,
) -> Result<Vec<LoteOrigen>, AppError> {
    let mut faltante = cantidad;
    let mut plan = Vec::new();

    for lote in lotes {
        if faltante <= Decimal::ZERO {
            break;
        }
        if lote.stock_actual <= Decimal::ZERO {
            continue;
        }

        let tomar = lote.stock_actual.min(faltante);
        plan.push(LoteOrigen {
            lote_id: lote.id,
            cantidad: tomar,
            costo_unitario: lote.precio_unitario,
        });
        faltante -= tomar;
    }

    if faltante > Decimal::ZERO {
        return Err(AppError::StockInsuficiente { faltante });
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn lote(stock: Decimal, costo: Decimal) -> LoteDisponible {
        LoteDisponible {
            id: Uuid::new_v4(),
            stock_actual: stock,
            precio_unitario: costo,
        }
    }

    // --- Distribución de venta ---

    #[test]
    fn distribucion_del_escenario_base() {
        // 10 unidades a 100, costo 60, flete 5
        let d = calcular_distribucion_venta(dec!(100), dec!(60), dec!(5), dec!(10));
        assert_eq!(d.precio_total_venta, dec!(1000));
        assert_eq!(d.monto_boveda_monte, dec!(600));
        assert_eq!(d.monto_fletes, dec!(50));
        assert_eq!(d.monto_utilidades, dec!(350));
    }

    #[test]
    fn la_distribucion_siempre_cierra_exacta() {
        let casos = [
            (dec!(100), dec!(60), dec!(5), dec!(10)),
            (dec!(99.99), dec!(33.33), dec!(0.01), dec!(7)),
            (dec!(1), dec!(0.97), dec!(0.02), dec!(3)),
            (dec!(1250.50), dec!(800.25), dec!(500), dec!(13)),
        ];
        for (pv, pc, pf, qty) in casos {
            let d = calcular_distribucion_venta(pv, pc, pf, qty);
            assert_eq!(
                d.monto_boveda_monte + d.monto_fletes + d.monto_utilidades,
                d.precio_total_venta,
            );
        }
    }

    #[test]
    fn la_utilidad_negativa_se_expone_sin_recortar() {
        // Venta a pérdida: precio menor que costo + flete
        let d = calcular_distribucion_venta(dec!(50), dec!(60), dec!(5), dec!(2));
        assert_eq!(d.monto_utilidades, dec!(-30));
        assert_eq!(
            d.monto_boveda_monte + d.monto_fletes + d.monto_utilidades,
            d.precio_total_venta,
        );
    }

    // --- Abonos ---

    #[test]
    fn abono_parcial_reparte_proporcional() {
        let historico = calcular_distribucion_venta(dec!(100), dec!(60), dec!(5), dec!(10));
        // Pago inicial de 400 sobre 1000 → 40% de cada bóveda
        let capital = calcular_abono(&historico, &CapitalLiberado::CERO, dec!(400), dec!(1000));
        assert_eq!(capital.boveda_monte, dec!(240));
        assert_eq!(capital.fletes, dec!(20));
        assert_eq!(capital.utilidades, dec!(140));
        assert_eq!(capital.total(), dec!(400));
    }

    #[test]
    fn el_abono_de_cierre_liquida_por_resta() {
        let historico = calcular_distribucion_venta(dec!(100), dec!(60), dec!(5), dec!(10));
        let primero = calcular_abono(&historico, &CapitalLiberado::CERO, dec!(400), dec!(1000));

        // Segundo abono de 600 liquida la venta: libera el remanente exacto
        let segundo = calcular_abono(&historico, &primero, dec!(600), dec!(600));
        assert_eq!(segundo.boveda_monte, dec!(360));
        assert_eq!(segundo.fletes, dec!(30));
        assert_eq!(segundo.utilidades, dec!(210));

        // El acumulado reproduce la distribución histórica sin residuo
        assert_eq!(primero.boveda_monte + segundo.boveda_monte, dec!(600));
        assert_eq!(primero.fletes + segundo.fletes, dec!(50));
        assert_eq!(primero.utilidades + segundo.utilidades, dec!(350));
    }

    #[test]
    fn cierre_exacto_aunque_las_proporciones_no_dividan_parejo() {
        // Total 333; tres abonos de 111 no reparten parejo por proporción,
        // pero el último debe cerrar sin residuo.
        let historico = calcular_distribucion_venta(dec!(111), dec!(70), dec!(7), dec!(3));
        assert_eq!(historico.precio_total_venta, dec!(333));

        let mut liberado = CapitalLiberado::CERO;
        let mut restante = dec!(333);
        for _ in 0..3 {
            let abono = calcular_abono(&historico, &liberado, dec!(111), restante);
            liberado = CapitalLiberado {
                boveda_monte: liberado.boveda_monte + abono.boveda_monte,
                fletes: liberado.fletes + abono.fletes,
                utilidades: liberado.utilidades + abono.utilidades,
            };
            restante -= dec!(111);
        }

        assert_eq!(liberado.boveda_monte, historico.monto_boveda_monte);
        assert_eq!(liberado.fletes, historico.monto_fletes);
        assert_eq!(liberado.utilidades, historico.monto_utilidades);
    }

    #[test]
    fn pago_unico_por_el_total_libera_el_historico_completo() {
        let historico = calcular_distribucion_venta(dec!(100), dec!(60), dec!(5), dec!(10));
        let capital = calcular_abono(&historico, &CapitalLiberado::CERO, dec!(1000), dec!(1000));
        assert_eq!(capital.boveda_monte, historico.monto_boveda_monte);
        assert_eq!(capital.fletes, historico.monto_fletes);
        assert_eq!(capital.utilidades, historico.monto_utilidades);
    }

    // --- Estados y totales ---

    #[test]
    fn derivacion_de_estado_de_pago() {
        assert_eq!(derivar_estado_pago(dec!(0), dec!(100)), EstadoPago::Pendiente);
        assert_eq!(derivar_estado_pago(dec!(40), dec!(100)), EstadoPago::Parcial);
        assert_eq!(derivar_estado_pago(dec!(100), dec!(100)), EstadoPago::Completo);
        assert_eq!(derivar_estado_pago(dec!(120), dec!(100)), EstadoPago::Completo);
    }

    #[test]
    fn total_de_orden_con_iva() {
        // (60 + 5) × 10 × 1.16
        let total = calcular_total_orden(dec!(60), dec!(5), dec!(10), dec!(0.16));
        assert_eq!(total, dec!(754));
    }

    #[test]
    fn total_de_orden_sin_iva() {
        let total = calcular_total_orden(dec!(60), dec!(5), dec!(10), Decimal::ZERO);
        assert_eq!(total, dec!(650));
    }

    // --- FIFO ---

    #[test]
    fn fifo_agota_el_lote_viejo_antes_del_nuevo() {
        // reserveFIFO(15) contra [{A,10},{B,10}] → [{A,10},{B,5}]
        let lotes = [lote(dec!(10), dec!(60)), lote(dec!(10), dec!(62))];
        let plan = planificar_fifo(&lotes, dec!(15)).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].lote_id, lotes[0].id);
        assert_eq!(plan[0].cantidad, dec!(10));
        assert_eq!(plan[1].lote_id, lotes[1].id);
        assert_eq!(plan[1].cantidad, dec!(5));
    }

    #[test]
    fn fifo_salta_lotes_sin_stock() {
        let lotes = [lote(Decimal::ZERO, dec!(60)), lote(dec!(10), dec!(62))];
        let plan = planificar_fifo(&lotes, dec!(4)).unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].lote_id, lotes[1].id);
        assert_eq!(plan[0].cantidad, dec!(4));
    }

    #[test]
    fn fifo_falla_sin_cubrir_si_no_alcanza() {
        let lotes = [lote(dec!(3), dec!(60)), lote(dec!(4), dec!(62))];
        match planificar_fifo(&lotes, dec!(10)) {
            Err(AppError::StockInsuficiente { faltante }) => assert_eq!(faltante, dec!(3)),
            otro => panic!("se esperaba StockInsuficiente, llegó {otro:?}"),
        }
    }

    #[test]
    fn fifo_conserva_las_unidades() {
        let lotes = [
            lote(dec!(7), dec!(60)),
            lote(dec!(2), dec!(61)),
            lote(dec!(9), dec!(62)),
        ];
        let plan = planificar_fifo(&lotes, dec!(12)).unwrap();
        let asignado: Decimal = plan.iter().map(|a| a.cantidad).sum();
        assert_eq!(asignado, dec!(12));
        // Ningún lote aporta más de lo que tenía
        for (asignacion, lote) in plan.iter().zip(lotes.iter()) {
            assert!(asignacion.cantidad <= lote.stock_actual);
        }
    }
}
