pub mod common;
pub mod compras;
pub mod repuestos;

use crate::db::DbPool;
use crate::services::{CompraService, RepuestoService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub compras: Arc<CompraService>,
    pub repuestos: Arc<RepuestoService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            compras: Arc::new(CompraService::new(db_pool.clone())),
            repuestos: Arc::new(RepuestoService::new(db_pool)),
        }
    }
}
