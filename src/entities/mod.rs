pub mod compra;
pub mod compra_por_repuesto;
pub mod proveedor;
pub mod repuesto;
