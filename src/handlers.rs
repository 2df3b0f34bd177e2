pub mod compras;
pub mod consultas;
pub mod pagos;
pub mod tesoreria;
pub mod ventas;
