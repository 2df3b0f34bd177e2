// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::common::notify::NotificadorVistas;
use crate::db::{
    BancosRepository, ClientesRepository, ComprasRepository, DistribuidoresRepository,
    MovimientosRepository, VentasRepository,
};
use crate::services::{ComprasService, PagosService, TesoreriaService, VentasService};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,

    pub ventas_service: VentasService,
    pub compras_service: ComprasService,
    pub pagos_service: PagosService,
    pub tesoreria_service: TesoreriaService,

    // Los handlers de consulta leen directo de los repositorios
    pub bancos_repo: BancosRepository,
    pub movimientos_repo: MovimientosRepository,
    pub ventas_repo: VentasRepository,
    pub compras_repo: ComprasRepository,
    pub clientes_repo: ClientesRepository,
    pub distribuidores_repo: DistribuidoresRepository,

    pub notificador: NotificadorVistas,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("Conexión con la base de datos establecida");

        // --- Grafo de dependencias ---
        let bancos_repo = BancosRepository::new(db_pool.clone());
        let movimientos_repo = MovimientosRepository::new(db_pool.clone());
        let ventas_repo = VentasRepository::new(db_pool.clone());
        let compras_repo = ComprasRepository::new(db_pool.clone());
        let clientes_repo = ClientesRepository::new(db_pool.clone());
        let distribuidores_repo = DistribuidoresRepository::new(db_pool.clone());
        let notificador = NotificadorVistas::new();

        let ventas_service = VentasService::new(
            ventas_repo.clone(),
            compras_repo.clone(),
            clientes_repo.clone(),
            bancos_repo.clone(),
            movimientos_repo.clone(),
            notificador.clone(),
        );
        let compras_service = ComprasService::new(
            compras_repo.clone(),
            distribuidores_repo.clone(),
            bancos_repo.clone(),
            movimientos_repo.clone(),
            notificador.clone(),
        );
        let pagos_service = PagosService::new(
            ventas_repo.clone(),
            compras_repo.clone(),
            clientes_repo.clone(),
            distribuidores_repo.clone(),
            bancos_repo.clone(),
            movimientos_repo.clone(),
            notificador.clone(),
        );
        let tesoreria_service = TesoreriaService::new(
            bancos_repo.clone(),
            movimientos_repo.clone(),
            notificador.clone(),
        );

        Ok(Self {
            db_pool,
            ventas_service,
            compras_service,
            pagos_service,
            tesoreria_service,
            bancos_repo,
            movimientos_repo,
            ventas_repo,
            compras_repo,
            clientes_repo,
            distribuidores_repo,
            notificador,
        })
    }
}
