use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    FromQueryResult, JoinType, NotSet, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::compra::{self, Entity as Compra, Model as CompraModel};
use crate::entities::proveedor;
use crate::errors::ServiceError;

/// Header fields written on create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompraHeader {
    pub fecha: DateTime<Utc>,
    pub proveedor_id: i32,
    pub total: Decimal,
    pub numerofactura: String,
}

/// Purchase header joined with the supplier's display fields
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct CompraConProveedor {
    pub id: i32,
    pub fecha: DateTime<Utc>,
    pub proveedor_id: i32,
    pub total: Decimal,
    pub numerofactura: String,
    pub proveedor_nombre: String,
    pub nombre_empresa: Option<String>,
}

/// NotFound error for a purchase id
pub fn compra_no_encontrada(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Compra con ID {} no encontrada", id))
}

/// Purchase header store
#[derive(Debug, Clone, Copy, Default)]
pub struct CompraRepository;

impl CompraRepository {
    fn select_con_proveedor() -> Select<Compra> {
        Compra::find()
            .select_only()
            .columns([
                compra::Column::Id,
                compra::Column::Fecha,
                compra::Column::ProveedorId,
                compra::Column::Total,
                compra::Column::Numerofactura,
            ])
            .column_as(proveedor::Column::Nombre, "proveedor_nombre")
            .column_as(proveedor::Column::NombreEmpresa, "nombre_empresa")
            .join(JoinType::InnerJoin, compra::Relation::Proveedor.def())
    }

    /// Insert a header and return its new ID
    pub async fn create<C>(conn: &C, header: CompraHeader) -> Result<i32, ServiceError>
    where
        C: ConnectionTrait,
    {
        let active = compra::ActiveModel {
            id: NotSet,
            fecha: Set(header.fecha),
            proveedor_id: Set(header.proveedor_id),
            total: Set(header.total),
            numerofactura: Set(header.numerofactura),
        };

        let model = active.insert(conn).await.map_err(ServiceError::DatabaseError)?;
        Ok(model.id)
    }

    /// Header only, without supplier fields
    pub async fn find_by_id<C>(conn: &C, id: i32) -> Result<Option<CompraModel>, ServiceError>
    where
        C: ConnectionTrait,
    {
        Compra::find_by_id(id)
            .one(conn)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_with_proveedor<C>(
        conn: &C,
        id: i32,
    ) -> Result<Option<CompraConProveedor>, ServiceError>
    where
        C: ConnectionTrait,
    {
        Self::select_con_proveedor()
            .filter(compra::Column::Id.eq(id))
            .into_model::<CompraConProveedor>()
            .one(conn)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Every header, newest first
    pub async fn find_all<C>(conn: &C) -> Result<Vec<CompraConProveedor>, ServiceError>
    where
        C: ConnectionTrait,
    {
        Self::select_con_proveedor()
            .order_by_desc(compra::Column::Fecha)
            .order_by_desc(compra::Column::Id)
            .into_model::<CompraConProveedor>()
            .all(conn)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn update<C>(conn: &C, id: i32, header: CompraHeader) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let result = Compra::update_many()
            .col_expr(compra::Column::Fecha, Expr::value(header.fecha))
            .col_expr(compra::Column::ProveedorId, Expr::value(header.proveedor_id))
            .col_expr(compra::Column::Total, Expr::value(header.total))
            .col_expr(compra::Column::Numerofactura, Expr::value(header.numerofactura))
            .filter(compra::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(compra_no_encontrada(id));
        }
        Ok(())
    }

    pub async fn delete<C>(conn: &C, id: i32) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let result = Compra::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(compra_no_encontrada(id));
        }
        Ok(())
    }
}
