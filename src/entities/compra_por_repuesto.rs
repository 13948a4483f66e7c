use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase line: one part, its quantity and the prices it was bought at
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "compras_por_repuesto")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub compras_id: i32,
    pub repuesto_id: i32,
    pub cantidad: i32,
    pub precio_compra: Decimal,
    pub precio_venta: Decimal,
    pub subtotal: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::compra::Entity",
        from = "Column::ComprasId",
        to = "super::compra::Column::Id",
        on_delete = "Cascade"
    )]
    Compra,
    #[sea_orm(
        belongs_to = "super::repuesto::Entity",
        from = "Column::RepuestoId",
        to = "super::repuesto::Column::Id"
    )]
    Repuesto,
}

impl Related<super::compra::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compra.def()
    }
}

impl Related<super::repuesto::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repuesto.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
