//! Create unit_profiles table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(UnitProfiles::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(UnitProfiles::UnitId)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(UnitProfiles::UnitNumber)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(UnitProfiles::DriverId).string())
            .to_owned();

        for cost in [
            UnitProfiles::TruckWeeklyCost,
            UnitProfiles::TrailerWeeklyCost,
            UnitProfiles::InsuranceWeeklyCost,
            UnitProfiles::TelematicsWeeklyCost,
            UnitProfiles::PermitsWeeklyCost,
            UnitProfiles::SgaWeeklyCost,
            UnitProfiles::MiscWeeklyCost,
        ] {
            table.col(ColumnDef::new(cost).double().not_null().default(0.0));
        }

        table
            .col(
                ColumnDef::new(UnitProfiles::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(
                ColumnDef::new(UnitProfiles::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(UnitProfiles::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            );

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UnitProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UnitProfiles {
    Table,
    UnitId,
    UnitNumber,
    DriverId,
    TruckWeeklyCost,
    TrailerWeeklyCost,
    InsuranceWeeklyCost,
    TelematicsWeeklyCost,
    PermitsWeeklyCost,
    SgaWeeklyCost,
    MiscWeeklyCost,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
