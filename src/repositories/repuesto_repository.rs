use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};

use crate::entities::repuesto::{self, Entity as Repuesto, Model as RepuestoModel};
use crate::errors::ServiceError;

/// Stock fields rewritten whenever a purchase touches a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepuestoStock {
    pub cantidad: i32,
    pub precio_compra: Decimal,
    pub precio_venta: Decimal,
    pub total: Decimal,
}

/// NotFound error for a part id
pub fn repuesto_no_encontrado(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Repuesto con ID {} no encontrado", id))
}

/// Inventory record store
#[derive(Debug, Clone, Copy, Default)]
pub struct RepuestoRepository;

impl RepuestoRepository {
    /// Find a part by ID
    pub async fn find_by_id<C>(conn: &C, id: i32) -> Result<Option<RepuestoModel>, ServiceError>
    where
        C: ConnectionTrait,
    {
        Repuesto::find_by_id(id)
            .one(conn)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// All parts ordered by name
    pub async fn find_all<C>(conn: &C) -> Result<Vec<RepuestoModel>, ServiceError>
    where
        C: ConnectionTrait,
    {
        Repuesto::find()
            .order_by_asc(repuesto::Column::Nombre)
            .order_by_asc(repuesto::Column::Id)
            .all(conn)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Overwrite the stock fields of `record`, leaving name and description alone
    pub async fn update_stock<C>(
        conn: &C,
        record: RepuestoModel,
        stock: RepuestoStock,
    ) -> Result<RepuestoModel, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut active: repuesto::ActiveModel = record.into();
        active.cantidad = Set(stock.cantidad);
        active.precio_compra = Set(stock.precio_compra);
        active.precio_venta = Set(stock.precio_venta);
        active.total = Set(stock.total);

        active.update(conn).await.map_err(ServiceError::DatabaseError)
    }
}
