use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::compra_por_repuesto::{
    self, Entity as DetalleCompra, Model as DetalleCompraModel,
};
use crate::errors::ServiceError;

/// Values for a new purchase line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuevoDetalle {
    pub compras_id: i32,
    pub repuesto_id: i32,
    pub cantidad: i32,
    pub precio_compra: Decimal,
    pub precio_venta: Decimal,
    pub subtotal: Decimal,
}

/// Purchase-line store
#[derive(Debug, Clone, Copy, Default)]
pub struct DetalleCompraRepository;

impl DetalleCompraRepository {
    /// Lines of a purchase in insertion order
    pub async fn find_by_compra<C>(
        conn: &C,
        compra_id: i32,
    ) -> Result<Vec<DetalleCompraModel>, ServiceError>
    where
        C: ConnectionTrait,
    {
        DetalleCompra::find()
            .filter(compra_por_repuesto::Column::ComprasId.eq(compra_id))
            .order_by_asc(compra_por_repuesto::Column::Id)
            .all(conn)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create<C>(conn: &C, detalle: NuevoDetalle) -> Result<i32, ServiceError>
    where
        C: ConnectionTrait,
    {
        let active = compra_por_repuesto::ActiveModel {
            id: NotSet,
            compras_id: Set(detalle.compras_id),
            repuesto_id: Set(detalle.repuesto_id),
            cantidad: Set(detalle.cantidad),
            precio_compra: Set(detalle.precio_compra),
            precio_venta: Set(detalle.precio_venta),
            subtotal: Set(detalle.subtotal),
        };

        let model = active.insert(conn).await.map_err(ServiceError::DatabaseError)?;
        Ok(model.id)
    }

    /// Remove every line of a purchase, returning how many were deleted
    pub async fn delete_by_compra<C>(conn: &C, compra_id: i32) -> Result<u64, ServiceError>
    where
        C: ConnectionTrait,
    {
        let result = DetalleCompra::delete_many()
            .filter(compra_por_repuesto::Column::ComprasId.eq(compra_id))
            .exec(conn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(result.rows_affected)
    }
}
