//! Create trip_costs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create()
            .table(TripCosts::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(TripCosts::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(TripCosts::CostId)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(TripCosts::TripId).string())
            .col(ColumnDef::new(TripCosts::OrderId).string().not_null())
            .col(ColumnDef::new(TripCosts::DriverId).string().not_null())
            .col(ColumnDef::new(TripCosts::UnitId).string())
            .col(ColumnDef::new(TripCosts::DriverType).string_len(8).not_null())
            .col(ColumnDef::new(TripCosts::OoZone).string_len(8))
            .col(ColumnDef::new(TripCosts::Miles).double().not_null())
            .col(ColumnDef::new(TripCosts::Direction).string_len(10).not_null())
            .col(
                ColumnDef::new(TripCosts::IsRoundTrip)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(TripCosts::WeekStart).date())
            .to_owned();

        for count in [
            TripCosts::BorderCrossings,
            TripCosts::DropHooks,
            TripCosts::Pickups,
            TripCosts::Deliveries,
        ] {
            table.col(ColumnDef::new(count).integer().not_null().default(0));
        }

        for cost in [
            TripCosts::FixedCpm,
            TripCosts::WageCpm,
            TripCosts::RollingCpm,
            TripCosts::AccessorialCpm,
            TripCosts::TotalCpm,
            TripCosts::TotalCost,
        ] {
            table.col(ColumnDef::new(cost).double().not_null());
        }

        for optional in [
            TripCosts::Revenue,
            TripCosts::Rpm,
            TripCosts::Ppm,
            TripCosts::Profit,
            TripCosts::MarginPct,
        ] {
            table.col(ColumnDef::new(optional).double());
        }

        table
            .col(ColumnDef::new(TripCosts::IsProfitable).boolean())
            .col(
                ColumnDef::new(TripCosts::CalculationFormula)
                    .text()
                    .not_null(),
            )
            .col(
                ColumnDef::new(TripCosts::CalculatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            );

        for actual in [
            TripCosts::ActualMiles,
            TripCosts::ActualCost,
            TripCosts::Variance,
            TripCosts::VariancePct,
        ] {
            table.col(ColumnDef::new(actual).double());
        }

        table.col(
            ColumnDef::new(TripCosts::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        );

        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_costs_order_id")
                    .table(TripCosts::Table)
                    .col(TripCosts::OrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TripCosts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TripCosts {
    Table,
    Id,
    CostId,
    TripId,
    OrderId,
    DriverId,
    UnitId,
    DriverType,
    OoZone,
    Miles,
    Direction,
    IsRoundTrip,
    WeekStart,
    BorderCrossings,
    DropHooks,
    Pickups,
    Deliveries,
    FixedCpm,
    WageCpm,
    RollingCpm,
    AccessorialCpm,
    TotalCpm,
    TotalCost,
    Revenue,
    Rpm,
    Ppm,
    Profit,
    MarginPct,
    IsProfitable,
    CalculationFormula,
    CalculatedAt,
    ActualMiles,
    ActualCost,
    Variance,
    VariancePct,
    UpdatedAt,
}
