use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier a purchase is bought from
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proveedor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nombre: String,
    pub nombre_empresa: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::compra::Entity")]
    Compras,
}

impl Related<super::compra::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compras.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
