//! Stateless repositories over the purchase tables.
//!
//! Every method takes the connection as an explicit `&C: ConnectionTrait`
//! so the same call works against the pool or inside a transaction.

pub mod compra_repository;
pub mod detalle_compra_repository;
pub mod repuesto_repository;

pub use compra_repository::{
    compra_no_encontrada, CompraConProveedor, CompraHeader, CompraRepository,
};
pub use detalle_compra_repository::{DetalleCompraRepository, NuevoDetalle};
pub use repuesto_repository::{repuesto_no_encontrado, RepuestoRepository, RepuestoStock};
