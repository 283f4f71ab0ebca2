//! Migration: roles, statuses and product types lookup tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(lookup_table(Roles::Table, Roles::Id, Roles::Code, Roles::Name)).await?;
        manager
            .create_table(lookup_table(Statuses::Table, Statuses::Id, Statuses::Code, Statuses::Name))
            .await?;
        manager
            .create_table(lookup_table(
                ProductTypes::Table,
                ProductTypes::Id,
                ProductTypes::Code,
                ProductTypes::Name,
            ))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProductTypes::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Statuses::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Roles::Table).to_owned()).await
    }
}

/// `(id, code unique, name)` table definition shared by every lookup.
fn lookup_table<T: Iden + 'static>(table: T, id: T, code: T, name: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(code).string_len(100).not_null().unique_key())
        .col(ColumnDef::new(name).string_len(100).not_null())
        .to_owned()
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Code,
    Name,
}

#[derive(Iden)]
enum Statuses {
    Table,
    Id,
    Code,
    Name,
}

#[derive(Iden)]
enum ProductTypes {
    Table,
    Id,
    Code,
    Name,
}
