pub mod bancos_repo;
pub use bancos_repo::BancosRepository;
pub mod clientes_repo;
pub use clientes_repo::ClientesRepository;
pub mod compras_repo;
pub use compras_repo::ComprasRepository;
pub mod distribuidores_repo;
pub use distribuidores_repo::DistribuidoresRepository;
pub mod movimientos_repo;
pub use movimientos_repo::MovimientosRepository;
pub mod ventas_repo;
pub use ventas_repo::VentasRepository;
