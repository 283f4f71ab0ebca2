//! Migration: append-only product workflow history.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductWorkflows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductWorkflows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductWorkflows::ProductId).integer().not_null())
                    .col(ColumnDef::new(ProductWorkflows::UserId).uuid().not_null())
                    .col(ColumnDef::new(ProductWorkflows::OldStatusId).integer().null())
                    .col(ColumnDef::new(ProductWorkflows::NewStatusId).integer().null())
                    .col(ColumnDef::new(ProductWorkflows::Message).text().null())
                    .col(
                        ColumnDef::new(ProductWorkflows::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_workflows_product")
                            .from(ProductWorkflows::Table, ProductWorkflows::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_workflows_user")
                            .from(ProductWorkflows::Table, ProductWorkflows::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_workflows_old_status")
                            .from(ProductWorkflows::Table, ProductWorkflows::OldStatusId)
                            .to(Statuses::Table, Statuses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_workflows_new_status")
                            .from(ProductWorkflows::Table, ProductWorkflows::NewStatusId)
                            .to(Statuses::Table, Statuses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_workflows_product")
                    .table(ProductWorkflows::Table)
                    .col(ProductWorkflows::ProductId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductWorkflows::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProductWorkflows {
    Table,
    Id,
    ProductId,
    UserId,
    OldStatusId,
    NewStatusId,
    Message,
    CreatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Statuses {
    Table,
    Id,
}
