pub mod compras_service;
pub use compras_service::ComprasService;
pub mod distribucion;
pub mod pagos_service;
pub use pagos_service::PagosService;
pub mod tesoreria_service;
pub use tesoreria_service::TesoreriaService;
pub mod ventas_service;
pub use ventas_service::VentasService;
