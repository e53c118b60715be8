//! Initial schema migration - creates all tables from scratch.
//!
//! - `essences`: bulk liquids, stock in ml
//! - `containers`: bottles, stock in units
//! - `sales`: the sale ledger
//!
//! `sales` references products by plain text ids and has no foreign keys:
//! deleting a product never touches its sales.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Essences {
    Table,
    Id,
    Name,
    Gender,
    StockMl,
    EntryCost,
    Supplier,
    ExpiryDate,
    CostPerMl,
}

#[derive(Iden)]
enum Containers {
    Table,
    Id,
    Name,
    Cost,
    CapacityMl,
    StockActual,
}

#[derive(Iden)]
enum Sales {
    Table,
    Id,
    ProductId,
    ContainerId,
    QuantityVendida,
    PrecioVenta,
    FechaVenta,
    Cliente,
    Ganancia,
    EssenceCost,
    ContainerCost,
    OverheadCost,
    ProductName,
    Gender,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Essences
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Essences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Essences::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Essences::Name).string().not_null())
                    .col(
                        ColumnDef::new(Essences::Gender)
                            .string()
                            .not_null()
                            .default("unisex"),
                    )
                    .col(ColumnDef::new(Essences::StockMl).double().not_null())
                    .col(ColumnDef::new(Essences::EntryCost).double().not_null())
                    .col(ColumnDef::new(Essences::Supplier).string().not_null())
                    .col(ColumnDef::new(Essences::ExpiryDate).date().not_null())
                    .col(ColumnDef::new(Essences::CostPerMl).double().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Containers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Containers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Containers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Containers::Name).string().not_null())
                    .col(ColumnDef::new(Containers::Cost).double().not_null())
                    .col(ColumnDef::new(Containers::CapacityMl).double().not_null())
                    .col(
                        ColumnDef::new(Containers::StockActual)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Sales (no foreign keys)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Sales::ProductId).string().not_null())
                    .col(ColumnDef::new(Sales::ContainerId).string())
                    .col(
                        ColumnDef::new(Sales::QuantityVendida)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sales::PrecioVenta).double().not_null())
                    .col(ColumnDef::new(Sales::FechaVenta).timestamp().not_null())
                    .col(ColumnDef::new(Sales::Cliente).string())
                    .col(ColumnDef::new(Sales::Ganancia).double().not_null())
                    .col(
                        ColumnDef::new(Sales::EssenceCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Sales::ContainerCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Sales::OverheadCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Sales::ProductName).string())
                    .col(ColumnDef::new(Sales::Gender).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sales-product_id")
                    .table(Sales::Table)
                    .col(Sales::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Containers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Essences::Table).to_owned())
            .await?;
        Ok(())
    }
}
