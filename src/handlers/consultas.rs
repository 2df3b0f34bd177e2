// src/handlers/consultas.rs

use axum::{extract::Query, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{common::error::AppError, config::AppState, models::bancos::BancoId};

// ---
// Handler: listar_bancos
// ---
#[utoipa::path(
    get,
    path = "/api/bancos",
    tag = "Consultas",
    responses((status = 200, description = "Las siete bóvedas con capital e históricos"))
)]
pub async fn listar_bancos(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let bancos = app_state.bancos_repo.listar().await?;
    Ok((StatusCode::OK, Json(bancos)))
}

// ---
// Query: filtro de movimientos
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MovimientosQuery {
    /// Limita la bitácora a una bóveda
    pub banco: Option<BancoId>,
    /// Máximo de filas (default 100)
    pub limite: Option<i64>,
}

// ---
// Handler: listar_movimientos
// ---
#[utoipa::path(
    get,
    path = "/api/movimientos",
    tag = "Consultas",
    params(MovimientosQuery),
    responses((status = 200, description = "Bitácora de capital, más recientes primero"))
)]
pub async fn listar_movimientos(
    State(app_state): State<AppState>,
    Query(query): Query<MovimientosQuery>,
) -> Result<impl IntoResponse, AppError> {
    let movimientos = app_state
        .movimientos_repo
        .listar(query.banco, query.limite.unwrap_or(100).clamp(1, 1000))
        .await?;
    Ok((StatusCode::OK, Json(movimientos)))
}

// ---
// Handler: listar_clientes
// ---
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Consultas",
    responses((status = 200, description = "Clientes con saldos y totales de por vida"))
)]
pub async fn listar_clientes(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let clientes = app_state.clientes_repo.listar().await?;
    Ok((StatusCode::OK, Json(clientes)))
}

// ---
// Handler: listar_distribuidores
// ---
#[utoipa::path(
    get,
    path = "/api/distribuidores",
    tag = "Consultas",
    responses((status = 200, description = "Distribuidores con saldos y volumen"))
)]
pub async fn listar_distribuidores(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let distribuidores = app_state.distribuidores_repo.listar().await?;
    Ok((StatusCode::OK, Json(distribuidores)))
}

// ---
// Handler: resumen_almacen
// ---
#[utoipa::path(
    get,
    path = "/api/almacen",
    tag = "Consultas",
    responses((status = 200, description = "Stock agregado valuado al costo de cada lote"))
)]
pub async fn resumen_almacen(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let resumen = app_state.compras_repo.resumen_almacen().await?;
    Ok((StatusCode::OK, Json(resumen)))
}
