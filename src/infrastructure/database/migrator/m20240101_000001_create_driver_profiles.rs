//! Create driver_profiles table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DriverProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DriverProfiles::DriverId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DriverProfiles::DriverName).string().not_null())
                    .col(
                        ColumnDef::new(DriverProfiles::DriverType)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DriverProfiles::OoZone).string_len(8))
                    .col(ColumnDef::new(DriverProfiles::UnitNumber).string())
                    .col(
                        ColumnDef::new(DriverProfiles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DriverProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriverProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum DriverProfiles {
    Table,
    DriverId,
    DriverName,
    DriverType,
    OoZone,
    UnitNumber,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
