pub mod bancos;
pub mod clientes;
pub mod compras;
pub mod distribuidores;
pub mod ventas;
