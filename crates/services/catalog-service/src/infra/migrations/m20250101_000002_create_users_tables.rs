//! Migration: users and their family assignments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::GoogleId).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Users::Firstname).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Lastname).string_len(255).not_null())
                    .col(ColumnDef::new(Users::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Picture).string_len(500).not_null())
                    .col(ColumnDef::new(Users::Locale).string_len(10).null())
                    .col(ColumnDef::new(Users::Domain).string_len(100).null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::Role).string_len(100).null())
                    .col(ColumnDef::new(Users::LastLogin).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserFamilyAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserFamilyAssignments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserFamilyAssignments::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserFamilyAssignments::AreaId).integer().not_null())
                    .col(ColumnDef::new(UserFamilyAssignments::FamilyId).integer().not_null())
                    .col(ColumnDef::new(UserFamilyAssignments::SubfamilyId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_family_assignments_user")
                            .from(UserFamilyAssignments::Table, UserFamilyAssignments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One assignment per (user, subfamily)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_family_assignments_user_subfamily")
                    .table(UserFamilyAssignments::Table)
                    .col(UserFamilyAssignments::UserId)
                    .col(UserFamilyAssignments::SubfamilyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Reverse lookup used for related users of a product
        manager
            .create_index(
                Index::create()
                    .name("idx_user_family_assignments_subfamily")
                    .table(UserFamilyAssignments::Table)
                    .col(UserFamilyAssignments::SubfamilyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserFamilyAssignments::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    GoogleId,
    Email,
    Firstname,
    Lastname,
    FullName,
    Picture,
    Locale,
    Domain,
    IsActive,
    Role,
    LastLogin,
    CreatedAt,
}

#[derive(Iden)]
enum UserFamilyAssignments {
    Table,
    Id,
    UserId,
    AreaId,
    FamilyId,
    SubfamilyId,
}
