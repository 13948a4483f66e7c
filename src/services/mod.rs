// Purchase workflow
pub mod compras;

// Read-only inventory lookups
pub mod repuestos;

pub use compras::{CompraDetallada, CompraService, DetalleEntrada, NuevaCompra};
pub use repuestos::RepuestoService;
