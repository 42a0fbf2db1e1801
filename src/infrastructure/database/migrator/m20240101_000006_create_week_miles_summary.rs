//! Create week_miles_summary table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WeekMilesSummary::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WeekMilesSummary::UnitNumber).string().not_null())
                    .col(ColumnDef::new(WeekMilesSummary::WeekStart).date().not_null())
                    .col(
                        ColumnDef::new(WeekMilesSummary::TotalMiles)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(WeekMilesSummary::TripCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(WeekMilesSummary::UnitNumber)
                            .col(WeekMilesSummary::WeekStart),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeekMilesSummary::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WeekMilesSummary {
    Table,
    UnitNumber,
    WeekStart,
    TotalMiles,
    TripCount,
}
