use crate::{
    db::DbPool, entities::repuesto::Model as RepuestoModel, errors::ServiceError,
    repositories::RepuestoRepository,
};
use std::sync::Arc;
use tracing::instrument;

/// Read access to the parts inventory.
///
/// Stock is only ever written by the purchase workflow.
#[derive(Clone)]
pub struct RepuestoService {
    db: Arc<DbPool>,
}

impl RepuestoService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub async fn listar(&self) -> Result<Vec<RepuestoModel>, ServiceError> {
        RepuestoRepository::find_all(self.db.as_ref()).await
    }

    #[instrument(skip(self))]
    pub async fn obtener(&self, id: i32) -> Result<Option<RepuestoModel>, ServiceError> {
        RepuestoRepository::find_by_id(self.db.as_ref(), id).await
    }
}
