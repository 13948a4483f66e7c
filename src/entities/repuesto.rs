use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Spare-part stock record.
///
/// `total` is kept equal to `cantidad * precio_venta` by every write that
/// goes through the purchase workflow.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repuesto")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub cantidad: i32,
    pub precio_compra: Decimal,
    pub precio_venta: Decimal,
    pub total: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::compra_por_repuesto::Entity")]
    ComprasPorRepuesto,
}

impl Related<super::compra_por_repuesto::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComprasPorRepuesto.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
