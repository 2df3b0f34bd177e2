// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Ventas ---
        handlers::ventas::crear_venta,
        handlers::ventas::listar_ventas,
        handlers::ventas::listar_abonos,

        // --- Compras ---
        handlers::compras::crear_orden,
        handlers::compras::listar_ordenes,
        handlers::compras::listar_pagos,

        // --- Pagos ---
        handlers::pagos::abonar_venta,
        handlers::pagos::pagar_orden,

        // --- Tesorería ---
        handlers::tesoreria::transferir,
        handlers::tesoreria::registrar_gasto,
        handlers::tesoreria::registrar_ingreso,

        // --- Consultas ---
        handlers::consultas::listar_bancos,
        handlers::consultas::listar_movimientos,
        handlers::consultas::listar_clientes,
        handlers::consultas::listar_distribuidores,
        handlers::consultas::resumen_almacen,
    ),
    components(
        schemas(
            // --- Bancos ---
            models::bancos::BancoId,
            models::bancos::Banco,
            models::bancos::TipoMovimiento,
            models::bancos::Movimiento,

            // --- Partes ---
            models::clientes::Cliente,
            models::distribuidores::Distribuidor,

            // --- Ventas ---
            models::ventas::EstadoPago,
            models::ventas::LoteOrigen,
            models::ventas::Venta,
            models::ventas::Abono,

            // --- Compras ---
            models::compras::OrdenCompra,
            models::compras::PagoDistribuidor,
            models::compras::ResumenAlmacen,

            // --- Resultados ---
            services::distribucion::DistribucionVenta,
            services::distribucion::CapitalLiberado,
            services::ventas_service::ResultadoVenta,
            services::ventas_service::AsignacionManual,
            services::compras_service::ResultadoOrden,
            services::pagos_service::ResultadoAbono,
            services::pagos_service::ResultadoPagoOrden,
            services::tesoreria_service::ResultadoTransferencia,
            services::tesoreria_service::ResultadoMovimiento,

            // --- Payloads ---
            handlers::ventas::CrearVentaPayload,
            handlers::compras::CrearOrdenPayload,
            handlers::pagos::AbonoPayload,
            handlers::pagos::PagoOrdenPayload,
            handlers::tesoreria::TransferenciaPayload,
            handlers::tesoreria::GastoPayload,
        )
    ),
    tags(
        (name = "Ventas", description = "Ventas con distribución a bóvedas y consumo FIFO"),
        (name = "Compras", description = "Órdenes de compra y entrada de lotes al almacén"),
        (name = "Pagos", description = "Abonos de clientes y pagos a distribuidores"),
        (name = "Tesorería", description = "Transferencias entre bóvedas, gastos e ingresos"),
        (name = "Consultas", description = "Lecturas de bóvedas, bitácora, partes y almacén")
    )
)]
pub struct ApiDoc;
