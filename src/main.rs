//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() está bien aquí: si la configuración falla, la aplicación
    // no debe arrancar.
    let app_state = AppState::new()
        .await
        .expect("Falla al inicializar el estado de la aplicación.");

    // Corre las migraciones de SQLx al arrancar
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falla al correr las migraciones de la base de datos.");

    tracing::info!("Migraciones de la base de datos ejecutadas");

    let api_routes = Router::new()
        .route(
            "/ventas",
            post(handlers::ventas::crear_venta).get(handlers::ventas::listar_ventas),
        )
        .route(
            "/ventas/{venta_id}/abonos",
            post(handlers::pagos::abonar_venta).get(handlers::ventas::listar_abonos),
        )
        .route(
            "/ordenes",
            post(handlers::compras::crear_orden).get(handlers::compras::listar_ordenes),
        )
        .route(
            "/ordenes/{orden_id}/pagos",
            post(handlers::pagos::pagar_orden).get(handlers::compras::listar_pagos),
        )
        .route("/transferencias", post(handlers::tesoreria::transferir))
        .route("/gastos", post(handlers::tesoreria::registrar_gasto))
        .route("/ingresos", post(handlers::tesoreria::registrar_ingreso))
        .route("/bancos", get(handlers::consultas::listar_bancos))
        .route("/movimientos", get(handlers::consultas::listar_movimientos))
        .route("/clientes", get(handlers::consultas::listar_clientes))
        .route("/distribuidores", get(handlers::consultas::listar_distribuidores))
        .route("/almacen", get(handlers::consultas::resumen_almacen))
        .route("/health", get(|| async { "OK" }));

    let app = Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falla al iniciar el listener TCP");
    tracing::info!("Servidor escuchando en {}", addr);
    axum::serve(listener, app).await.expect("Error en el servidor Axum");
}
