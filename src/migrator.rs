use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_proveedor_table::Migration),
            Box::new(m20240101_000002_create_repuesto_table::Migration),
            Box::new(m20240101_000003_create_compras_table::Migration),
            Box::new(m20240101_000004_create_compras_por_repuesto_table::Migration),
        ]
    }
}

mod m20240101_000001_create_proveedor_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_proveedor_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Proveedor::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Proveedor::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Proveedor::Nombre).string().not_null())
                        .col(ColumnDef::new(Proveedor::NombreEmpresa).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Proveedor::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Proveedor {
        Table,
        Id,
        Nombre,
        NombreEmpresa,
    }
}

mod m20240101_000002_create_repuesto_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_repuesto_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Repuesto::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Repuesto::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Repuesto::Nombre).string().not_null())
                        .col(ColumnDef::new(Repuesto::Descripcion).string().null())
                        .col(
                            ColumnDef::new(Repuesto::Cantidad)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Repuesto::PrecioCompra)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Repuesto::PrecioVenta)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Repuesto::Total)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Repuesto::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Repuesto {
        Table,
        Id,
        Nombre,
        Descripcion,
        Cantidad,
        PrecioCompra,
        PrecioVenta,
        Total,
    }
}

mod m20240101_000003_create_compras_table {

    use super::m20240101_000001_create_proveedor_table::Proveedor;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_compras_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Compras::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Compras::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Compras::Fecha)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Compras::ProveedorId).integer().not_null())
                        .col(
                            ColumnDef::new(Compras::Total)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Compras::Numerofactura).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_compras_proveedor_id")
                                .from(Compras::Table, Compras::ProveedorId)
                                .to(Proveedor::Table, Proveedor::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_compras_fecha")
                        .table(Compras::Table)
                        .col(Compras::Fecha)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Compras::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Compras {
        Table,
        Id,
        Fecha,
        ProveedorId,
        Total,
        Numerofactura,
    }
}

mod m20240101_000004_create_compras_por_repuesto_table {

    use super::m20240101_000002_create_repuesto_table::Repuesto;
    use super::m20240101_000003_create_compras_table::Compras;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_compras_por_repuesto_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ComprasPorRepuesto::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ComprasPorRepuesto::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ComprasPorRepuesto::ComprasId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ComprasPorRepuesto::RepuestoId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ComprasPorRepuesto::Cantidad)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ComprasPorRepuesto::PrecioCompra)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ComprasPorRepuesto::PrecioVenta)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ComprasPorRepuesto::Subtotal)
                                .decimal()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_compras_por_repuesto_compras_id")
                                .from(ComprasPorRepuesto::Table, ComprasPorRepuesto::ComprasId)
                                .to(Compras::Table, Compras::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_compras_por_repuesto_repuesto_id")
                                .from(ComprasPorRepuesto::Table, ComprasPorRepuesto::RepuestoId)
                                .to(Repuesto::Table, Repuesto::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_compras_por_repuesto_compras_id")
                        .table(ComprasPorRepuesto::Table)
                        .col(ComprasPorRepuesto::ComprasId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_compras_por_repuesto_repuesto_id")
                        .table(ComprasPorRepuesto::Table)
                        .col(ComprasPorRepuesto::RepuestoId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ComprasPorRepuesto::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ComprasPorRepuesto {
        Table,
        Id,
        ComprasId,
        RepuestoId,
        Cantidad,
        PrecioCompra,
        PrecioVenta,
        Subtotal,
    }
}
