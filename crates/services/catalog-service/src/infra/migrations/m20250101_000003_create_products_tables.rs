//! Migration: products, per-country settings and videos.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Sku).string_len(100).not_null().unique_key())
                    .col(ColumnDef::new(Products::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Products::ProductTypeId).integer().null())
                    .col(ColumnDef::new(Products::StatusId).integer().null())
                    .col(ColumnDef::new(Products::Published).boolean().not_null().default(false))
                    .col(ColumnDef::new(Products::Description).text().null())
                    .col(ColumnDef::new(Products::ShortDescription).string_len(193).null())
                    .col(ColumnDef::new(Products::Specifications).text().null())
                    .col(ColumnDef::new(Products::Applications).text().null())
                    .col(ColumnDef::new(Products::Brand).string_len(100).null())
                    .col(ColumnDef::new(Products::Url).string_len(500).null())
                    .col(ColumnDef::new(Products::Area).string_len(255).null())
                    .col(ColumnDef::new(Products::AreaCode).integer().null())
                    .col(ColumnDef::new(Products::Family).string_len(255).null())
                    .col(ColumnDef::new(Products::FamilyCode).integer().null())
                    .col(ColumnDef::new(Products::Subfamily).string_len(255).null())
                    .col(ColumnDef::new(Products::SubfamilyCode).integer().null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_product_type")
                            .from(Products::Table, Products::ProductTypeId)
                            .to(ProductTypes::Table, ProductTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_status")
                            .from(Products::Table, Products::StatusId)
                            .to(Statuses::Table, Statuses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_subfamily_code")
                    .table(Products::Table)
                    .col(Products::SubfamilyCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductCountries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductCountries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductCountries::ProductId).integer().not_null())
                    .col(ColumnDef::new(ProductCountries::CountryCode).string_len(2).not_null())
                    .col(ColumnDef::new(ProductCountries::Enabled).boolean().not_null().default(true))
                    .col(ColumnDef::new(ProductCountries::Sellable).boolean().not_null().default(true))
                    .col(ColumnDef::new(ProductCountries::CategoryCode).string_len(100).null())
                    .col(ColumnDef::new(ProductCountries::Category).text().null())
                    .col(ColumnDef::new(ProductCountries::Related).text().null())
                    .col(ColumnDef::new(ProductCountries::Substitute).text().not_null().default(""))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_countries_product")
                            .from(ProductCountries::Table, ProductCountries::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_countries_product_country")
                    .table(ProductCountries::Table)
                    .col(ProductCountries::ProductId)
                    .col(ProductCountries::CountryCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductVideos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductVideos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductVideos::ProductId).integer().not_null())
                    .col(ColumnDef::new(ProductVideos::YoutubeUrl).string_len(200).not_null())
                    .col(ColumnDef::new(ProductVideos::Order).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(ProductVideos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_videos_product")
                            .from(ProductVideos::Table, ProductVideos::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_videos_product_url")
                    .table(ProductVideos::Table)
                    .col(ProductVideos::ProductId)
                    .col(ProductVideos::YoutubeUrl)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProductVideos::Table).to_owned()).await?;
        manager
            .drop_table(Table::drop().table(ProductCountries::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Products::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Sku,
    Name,
    ProductTypeId,
    StatusId,
    Published,
    Description,
    ShortDescription,
    Specifications,
    Applications,
    Brand,
    Url,
    Area,
    AreaCode,
    Family,
    FamilyCode,
    Subfamily,
    SubfamilyCode,
    CreatedAt,
}

#[derive(Iden)]
enum ProductCountries {
    Table,
    Id,
    ProductId,
    CountryCode,
    Enabled,
    Sellable,
    CategoryCode,
    Category,
    Related,
    Substitute,
}

#[derive(Iden)]
enum ProductVideos {
    Table,
    Id,
    ProductId,
    YoutubeUrl,
    Order,
    CreatedAt,
}

#[derive(Iden)]
enum ProductTypes {
    Table,
    Id,
}

#[derive(Iden)]
enum Statuses {
    Table,
    Id,
}
