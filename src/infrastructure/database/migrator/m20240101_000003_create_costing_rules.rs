//! Create costing_rules table and load the default rate table

use sea_orm_migration::prelude::*;

use crate::infrastructure::seed;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CostingRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CostingRules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CostingRules::RuleKey).string_len(50).not_null())
                    .col(ColumnDef::new(CostingRules::RuleType).string_len(50).not_null())
                    .col(ColumnDef::new(CostingRules::RuleValue).double().not_null())
                    .col(ColumnDef::new(CostingRules::Description).string())
                    .col(
                        ColumnDef::new(CostingRules::EffectiveDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostingRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CostingRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostingRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_costing_rules_key_type")
                    .table(CostingRules::Table)
                    .col(CostingRules::RuleKey)
                    .col(CostingRules::RuleType)
                    .to_owned(),
            )
            .await?;

        let now = chrono::Utc::now();
        let mut insert = Query::insert()
            .into_table(CostingRules::Table)
            .columns([
                CostingRules::RuleKey,
                CostingRules::RuleType,
                CostingRules::RuleValue,
                CostingRules::Description,
                CostingRules::EffectiveDate,
                CostingRules::IsActive,
                CostingRules::CreatedAt,
                CostingRules::UpdatedAt,
            ])
            .to_owned();

        for rule in seed::default_rate_rules() {
            insert.values_panic([
                rule.rule_key.into(),
                rule.rule_type.into(),
                rule.value.into(),
                rule.description.into(),
                rule.effective_date.into(),
                rule.is_active.into(),
                now.into(),
                now.into(),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CostingRules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CostingRules {
    Table,
    Id,
    RuleKey,
    RuleType,
    RuleValue,
    Description,
    EffectiveDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
